//! Error types for the transport substrate.

use thiserror::Error;

/// Reason a link stopped working.
///
/// Stored as the link's last error, so it has to be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// A read or write did not finish within the configured timeout
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The peer closed the connection
    #[error("connection closed by peer")]
    PeerClosed,

    /// The link was closed on this side
    #[error("connection closed")]
    Closed,

    /// The underlying WebSocket reported an error
    #[error("connection error: {0}")]
    Connection(String),

    /// A frame could not be encoded or decoded as a payload
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Codec(e.to_string())
    }
}
