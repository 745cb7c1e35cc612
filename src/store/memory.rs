//! HashMap-backed store for tests and ephemeral sessions.

use super::{KeyValueStore, StoreError};
use crate::model::{Record, RecordKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory key-value store.
///
/// Clone-friendly via `Arc`; clones see the same data.
#[derive(Clone, Default, Debug)]
pub struct InMemoryStore {
    records: Arc<Mutex<HashMap<(String, RecordKey), Record>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all namespaces.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored records in `namespace`.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .count()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn put(
        &self,
        namespace: &str,
        key: &RecordKey,
        record: &Record,
    ) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((namespace.to_string(), key.clone()), record.clone());
        Ok(())
    }

    async fn get(&self, namespace: &str, key: &RecordKey) -> Result<Option<Record>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(namespace.to_string(), key.clone()))
            .cloned())
    }
}
