//! Error types for the chat client.

use thiserror::Error;

use onechat_shared::TransportError;

/// Client-specific errors. Every one of them ends the client process.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The room could not be reached
    #[error("failed to connect to {url}: {reason}")]
    Dial { url: String, reason: String },

    /// The link failed before the handshake completed
    #[error("handshake failed: {0}")]
    Handshake(#[source] TransportError),

    /// The link failed after the handshake
    #[error("connection lost: {0}")]
    Transport(#[from] TransportError),

    /// Local input could not be read
    #[error("input error: {0}")]
    Input(String),
}
