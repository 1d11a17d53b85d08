//! Error types for the hosting side.

use thiserror::Error;

/// Errors that stop the server as a whole.
///
/// Per-connection failures never end up here; they only close that connection.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The bound address could not be read back
    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),

    /// The accept loop failed
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
