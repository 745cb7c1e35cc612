//! # Key-Value Store
//!
//! Local persistence for records fetched or created through a resource.
//! Records are keyed by the composite `(namespace, key)` where the namespace is
//! the request URI and the key is the record's [`RecordKey`].
//!
//! - [`SqliteStore`] is durable and opens its database lazily on first use.
//! - [`InMemoryStore`] keeps everything in a `HashMap`.

mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::model::{Record, RecordKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Async put/get over a persistent local store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Upserts `record` under `(namespace, key)`.
    async fn put(&self, namespace: &str, key: &RecordKey, record: &Record)
        -> Result<(), StoreError>;

    /// Returns the record stored under `(namespace, key)`, if any.
    async fn get(&self, namespace: &str, key: &RecordKey) -> Result<Option<Record>, StoreError>;
}

/// Names of the database and of the store inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database name; the SQLite file is `<database>.sqlite3`. Defaults to `TakeoutDB`.
    pub database: String,
    /// Table holding the records. Defaults to `resources`.
    pub store: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: "TakeoutDB".to_string(),
            store: "resources".to_string(),
        }
    }
}

impl StoreConfig {
    /// Checks that both names are non-empty ASCII alphanumerics or `_`.
    pub fn validate(&self) -> Result<(), StoreError> {
        for name in [&self.database, &self.store] {
            let valid = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(StoreError::InvalidName(name.clone()));
            }
        }
        Ok(())
    }
}
