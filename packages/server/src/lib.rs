//! Single-room chat host.
//!
//! Layers:
//! - `domain`: identity registry, broadcast dispatcher, server notices
//! - `usecase`: the room and its connection lifecycle
//! - `infrastructure`: adapters from the transport substrate to the domain
//! - `ui`: axum server, WebSocket and HTTP handlers

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use error::ServerError;
pub use ui::{Server, ServerConfig};
pub use usecase::Room;
