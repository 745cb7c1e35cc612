//! Error types for the key-value store.

use thiserror::Error;

/// Errors that can occur while reading or writing the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying SQLite database failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A record could not be encoded or decoded.
    #[error("record serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),

    /// A configured database or store name is unusable.
    #[error("invalid store name: {0:?}")]
    InvalidName(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}
