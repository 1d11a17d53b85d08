//! UseCase layer: the room and its connection lifecycle.

mod room;

pub use room::Room;
