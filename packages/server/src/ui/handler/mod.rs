//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{debug_room_state, health_check};
pub use websocket::{serve_connection, websocket_handler};
