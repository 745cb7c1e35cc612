//! # Resource
//!
//! A [`Resource`] is bound to one endpoint URI. It creates records on the
//! server and reads the server's collection back, reconciling both with the
//! records it created itself.
//!
//! ## Optimistic writes
//!
//! `create` inserts its payload at the front of the resource's optimistic log
//! *before* the request goes out. Every later `read` merges the log into the
//! server's answer, so a new record shows up immediately, then keeps showing
//! up (as the server-confirmed version) until the server lists it itself.
//!
//! ```text
//! server:  [{id:1}, {id:2}]
//! create({title:"Optimistic 1"})  -> {id:10, ...}
//! create({title:"Optimistic 2"})  -> {id:11, ...}
//! read()   -> [{id:11}, {id:10}, {id:1}, {id:2}]
//! ```
//!
//! ## Concurrency
//!
//! All operations take `&self`. The log is guarded by a mutex that is never
//! held across an `.await`. `create` inserts during the call itself, so a
//! `read` started after `create` was called sees that entry even if the
//! create future has not been polled yet. Reads and creates whose requests
//! overlap are not ordered against each other.
//!
//! ## Persistence
//!
//! Every record a `read` returns is written to the [`KeyValueStore`] under the
//! resolved URI. Writes of one read run concurrently; the read fails if any of
//! them fails, without undoing the ones that succeeded.

mod error;
mod optimistic;
mod options;

pub use error::ResourceError;
pub use optimistic::{EntryState, OptimisticEntry, PendingToken};
pub use options::{CreateOptions, Payload, ReadOptions, RequestOptions, ResourceOptions};

use crate::collection::Collection;
use crate::model::{into_record, Record, RecordKey};
use crate::store::KeyValueStore;
use crate::transport::{Headers, HttpRequest, HttpResponse, Method, Transport};
use futures::future::join_all;
use optimistic::{merge, OptimisticLog};
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, info_span, instrument, Instrument};

/// Client-side handle on one collection endpoint.
pub struct Resource<T: Transport, S: KeyValueStore> {
    uri: String,
    options: ResourceOptions,
    transport: Arc<T>,
    store: Arc<S>,
    log: Mutex<OptimisticLog>,
}

impl<T: Transport, S: KeyValueStore> Resource<T, S> {
    pub fn new(
        uri: impl Into<String>,
        options: ResourceOptions,
        transport: Arc<T>,
        store: Arc<S>,
    ) -> Self {
        Self {
            uri: uri.into(),
            options,
            transport,
            store,
            log: Mutex::new(OptimisticLog::default()),
        }
    }

    /// The URI this resource is bound to.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn options(&self) -> &ResourceOptions {
        &self.options
    }

    /// Snapshot of the optimistic log, most recent first.
    pub fn optimistic_entries(&self) -> Vec<OptimisticEntry> {
        self.log().snapshot()
    }

    /// Sends `data` to the server and resolves to the record it confirms.
    ///
    /// The optimistic insert happens in this call, before the returned future
    /// is polled, so any `read` issued afterwards sees the payload. On failure
    /// the entry is removed before the error is returned. Dropping the future
    /// unfinished leaves the entry pending.
    ///
    /// # Errors
    /// - [`ResourceError::CreateFailed`] for a non-success status.
    /// - [`ResourceError::Decode`] / [`ResourceError::InvalidResponseShape`]
    ///   when the success body is not a JSON object.
    /// - [`ResourceError::Transport`] when the exchange itself fails.
    pub fn create(
        &self,
        data: impl Into<Payload>,
        options: CreateOptions,
    ) -> impl Future<Output = Result<Record, ResourceError>> + Send + '_ {
        let payload = data.into();
        let token = self.log().begin(payload.optimistic_record());

        let CreateOptions {
            method,
            request,
            uri,
        } = options;
        let uri = uri.unwrap_or_else(|| self.uri.clone());
        let method = method.unwrap_or(Method::Post);
        let span = info_span!("create", %uri, %method, %token);
        span.in_scope(|| debug!("Optimistic insert"));

        async move {
            match self.send_create(&uri, method, &request, payload).await {
                Ok(record) => {
                    self.log().confirm(token, record.clone());
                    info!("Created");
                    Ok(record)
                }
                Err(err) => {
                    self.log().rollback(token);
                    debug!("Rolled back");
                    Err(err)
                }
            }
        }
        .instrument(span)
    }

    async fn send_create(
        &self,
        uri: &str,
        method: Method,
        overrides: &RequestOptions,
        payload: Payload,
    ) -> Result<Record, ResourceError> {
        let mut headers = self.headers(overrides);
        if payload.is_json() && !headers.contains("content-type") {
            headers.insert("content-type", "application/json");
        }
        let request = HttpRequest::new(method, uri)
            .with_headers(headers)
            .with_body(payload.into_body()?);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ResourceError::CreateFailed {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let value: Value = serde_json::from_slice(&response.body)?;
        into_record(value).ok_or_else(|| ResourceError::InvalidResponseShape {
            uri: uri.to_string(),
            reason: "expected a JSON object".to_string(),
        })
    }

    /// Fetches the collection, merges in optimistic records, persists the
    /// result and returns it.
    ///
    /// Never modifies the optimistic log.
    ///
    /// # Errors
    /// - [`ResourceError::InvalidResponseShape`] unless the body is an array of
    ///   objects.
    /// - [`ResourceError::MissingKeyField`] if a merged record has no key.
    /// - [`ResourceError::Transport`] / [`ResourceError::Store`] from the
    ///   collaborators.
    #[instrument(skip(self, options), fields(uri = tracing::field::Empty, key = %options.key))]
    pub async fn read(&self, options: ReadOptions) -> Result<Collection, ResourceError> {
        let uri = options.uri.clone().unwrap_or_else(|| self.uri.clone());
        tracing::Span::current().record("uri", uri.as_str());

        let request =
            HttpRequest::new(Method::Get, uri.as_str()).with_headers(self.headers(&options.request));
        let response = self.transport.send(request).await?;
        let server = parse_collection(&uri, &response)?;
        let server_count = server.len();

        let optimistic = self.log().records();
        let merged = merge(optimistic, server, &options.key);
        debug!(
            server = server_count,
            optimistic = merged.len() - server_count,
            "Merged"
        );

        self.persist(&uri, &merged, &options.key).await?;
        info!(count = merged.len(), "Read");
        Ok(Collection::new(merged))
    }

    /// Looks up a record previously persisted under the bound URI.
    pub async fn cached(&self, key: impl Into<Value>) -> Result<Option<Record>, ResourceError> {
        let key = RecordKey::from(key.into());
        Ok(self.store.get(&self.uri, &key).await?)
    }

    async fn persist(
        &self,
        namespace: &str,
        records: &[Record],
        key_field: &str,
    ) -> Result<(), ResourceError> {
        let puts = records.iter().map(|record| async move {
            let key = RecordKey::of(record, key_field).ok_or_else(|| {
                ResourceError::MissingKeyField {
                    key_field: key_field.to_string(),
                    namespace: namespace.to_string(),
                }
            })?;
            self.store.put(namespace, &key, record).await?;
            Ok::<_, ResourceError>(())
        });

        join_all(puts).await.into_iter().collect()
    }

    fn headers(&self, overrides: &RequestOptions) -> Headers {
        let mut headers = self.options.request.headers.clone();
        headers.merge(&overrides.headers);
        headers
    }

    fn log(&self) -> MutexGuard<'_, OptimisticLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_collection(uri: &str, response: &HttpResponse) -> Result<Vec<Record>, ResourceError> {
    let invalid = |reason: &str| ResourceError::InvalidResponseShape {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let Value::Array(items) = serde_json::from_slice::<Value>(&response.body)? else {
        return Err(invalid("expected a JSON array"));
    };
    items
        .into_iter()
        .map(|item| into_record(item).ok_or_else(|| invalid("expected every element to be an object")))
        .collect()
}

impl<T: Transport, S: KeyValueStore> std::fmt::Debug for Resource<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("uri", &self.uri)
            .field("options", &self.options)
            .field("optimistic", &self.log().snapshot().len())
            .finish_non_exhaustive()
    }
}
