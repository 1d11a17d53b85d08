//! Line-based chat client for a onechat room.
//!
//! After a one-time handshake the client runs two loops side by side:
//! a receive loop that polls the link on a fixed period and prints what
//! arrived, and a send loop that forwards every line typed by the user.

pub mod cli;
pub mod connection;
pub mod error;
pub mod formatter;
pub mod input;
pub mod runner;
pub mod session;

pub use error::ClientError;
pub use runner::{run_client, run_client_with};
pub use session::{ClientConfig, Session};
