//! Shared building blocks for the onechat server and client.
//!
//! - `protocol`: the payload kinds exchanged over a link
//! - `transport`: WebSocket links with timeouts, batch receive and close reasons
//! - `logger`: tracing subscriber setup used by the binary

pub mod config;
pub mod error;
pub mod logger;
pub mod protocol;
pub mod transport;

pub use config::TransportConfig;
pub use error::TransportError;
pub use protocol::{ChatMessage, ConnectionId, Payload};
