//! Adapters between the transport substrate and the room.

pub mod dto;
pub mod outbox_sink;
