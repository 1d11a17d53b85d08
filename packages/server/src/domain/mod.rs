//! Domain layer of the room.
//!
//! Pure data structures and functions; no locking or I/O happens here.

pub mod dispatcher;
pub mod notice;
pub mod registry;

pub use dispatcher::{DeliveryReport, MessageSink, broadcast};
pub use notice::{SERVER_SENDER, joined_notice, left_notice};
pub use registry::{IdentityRegistry, UNKNOWN_NAME};
