//! Error types for the transport layer.

use super::Method;
use thiserror::Error;

/// Errors raised while exchanging a request with the network.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or no response arrived.
    #[error("{method} {uri} failed: {source}")]
    Request {
        method: Method,
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The response arrived but its body could not be read.
    #[error("reading response body from {uri} failed: {source}")]
    Body {
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A header name or value is not valid on the wire.
    #[error("invalid header: {name}")]
    InvalidHeader { name: String },
}
