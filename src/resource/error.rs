//! Error types for resource operations.

use crate::store::StoreError;
use crate::transport::TransportError;
use thiserror::Error;

/// Errors returned by [`Resource::create`](super::Resource::create) and
/// [`Resource::read`](super::Resource::read).
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The response body has the wrong JSON shape (not an array of objects
    /// for a read, not an object for a create).
    #[error("invalid response shape from {uri}: {reason}")]
    InvalidResponseShape { uri: String, reason: String },

    /// A record about to be persisted has no value at the key field.
    #[error("record in {namespace} is missing key field {key_field:?}")]
    MissingKeyField { key_field: String, namespace: String },

    /// The server answered a create request with a non-success status.
    #[error("create failed: {status} {status_text}")]
    CreateFailed { status: u16, status_text: String },

    /// The response body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResourceError {
    /// HTTP status carried by a [`ResourceError::CreateFailed`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ResourceError::CreateFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
