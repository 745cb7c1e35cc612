use crate::resource::{Resource, ResourceOptions};
use crate::store::{KeyValueStore, SqliteStore, StoreConfig, StoreError};
use crate::transport::{HttpTransport, Transport};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Process-wide settings for [`Takeout::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeoutConfig {
    /// Directory holding the SQLite database file. Defaults to `.`.
    pub data_dir: PathBuf,
    /// Database and table names.
    pub store: StoreConfig,
    /// Options every resource starts from; per-resource options override them.
    pub defaults: ResourceOptions,
}

impl Default for TakeoutConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            store: StoreConfig::default(),
            defaults: ResourceOptions::default(),
        }
    }
}

/// Shared wiring for a set of resources.
///
/// `Takeout` is responsible for:
/// - **Dependency Wiring**: one transport and one store, shared by every
///   resource it hands out
/// - **Defaults**: request options applied to every resource
///
/// # Example
///
/// ```ignore
/// let takeout = Takeout::new(TakeoutConfig::default())?;
/// let posts = takeout.resource("https://api.example.com/posts", ResourceOptions::default());
///
/// let created = posts.create(record, CreateOptions::default()).await?;
/// let all = posts.read(ReadOptions::default()).await?;
/// ```
pub struct Takeout<T: Transport, S: KeyValueStore> {
    transport: Arc<T>,
    store: Arc<S>,
    defaults: ResourceOptions,
}

impl Takeout<HttpTransport, SqliteStore> {
    /// Production wiring: a `reqwest` client and a lazily opened SQLite store
    /// at `<data_dir>/<database>.sqlite3`.
    pub fn new(config: TakeoutConfig) -> Result<Self, StoreError> {
        let store = SqliteStore::new(&config.data_dir, config.store)?;
        info!(path = ?store.path(), "Takeout configured");
        Ok(Self::with_parts(HttpTransport::new(), store).with_defaults(config.defaults))
    }
}

impl<T: Transport, S: KeyValueStore> Takeout<T, S> {
    /// Wires explicit collaborators, e.g. mocks in tests.
    pub fn with_parts(transport: T, store: S) -> Self {
        Self {
            transport: Arc::new(transport),
            store: Arc::new(store),
            defaults: ResourceOptions::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ResourceOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// A resource bound to `uri`.
    ///
    /// Its headers are the takeout defaults overlaid with `options`.
    pub fn resource(&self, uri: impl Into<String>, options: ResourceOptions) -> Resource<T, S> {
        let mut merged = self.defaults.clone();
        merged.request.headers.merge(&options.request.headers);
        Resource::new(uri, merged, self.transport.clone(), self.store.clone())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Binds a resource to `uri` with the default wiring.
///
/// Equivalent to `Takeout::new(TakeoutConfig::default())?.resource(uri, options)`.
pub fn takeout(
    uri: impl Into<String>,
    options: ResourceOptions,
) -> Result<Resource<HttpTransport, SqliteStore>, StoreError> {
    Ok(Takeout::new(TakeoutConfig::default())?.resource(uri, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::store::InMemoryStore;

    #[test]
    fn test_resource_options_override_defaults() {
        let takeout = Takeout::with_parts(MockTransport::new(), InMemoryStore::new())
            .with_defaults(ResourceOptions::default().header("Accept", "a").header("X-App", "t"));
        let resource = takeout.resource("/posts", ResourceOptions::default().header("accept", "b"));

        let headers = &resource.options().request.headers;
        assert_eq!(headers.get("accept"), Some("b"));
        assert_eq!(headers.get("x-app"), Some("t"));
        assert_eq!(resource.uri(), "/posts");
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config: TakeoutConfig =
            serde_json::from_str(r#"{ "store": { "store": "posts_cache" } }"#).unwrap();
        assert_eq!(config.store.database, "TakeoutDB");
        assert_eq!(config.store.store, "posts_cache");
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_new_rejects_bad_store_names() {
        let config = TakeoutConfig {
            store: StoreConfig {
                database: "../escape".to_string(),
                ..StoreConfig::default()
            },
            ..TakeoutConfig::default()
        };
        assert!(matches!(Takeout::new(config), Err(StoreError::InvalidName(_))));
    }

    #[test]
    fn test_factory_binds_uri_without_touching_disk() {
        let db = std::path::Path::new("TakeoutDB.sqlite3");
        let existed = db.exists();

        let resource = takeout("/posts", ResourceOptions::default()).unwrap();
        assert_eq!(resource.uri(), "/posts");
        assert_eq!(db.exists(), existed);
    }
}
