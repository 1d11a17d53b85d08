//! UI layer: axum server, WebSocket and HTTP endpoints.

pub mod handler;
mod server;
mod signal;
mod state;

pub use server::{Server, ServerConfig, router};
pub use signal::shutdown_signal;
pub use state::AppState;
