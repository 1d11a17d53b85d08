//! Adapters between WebSocket frame types and payload bytes.
//!
//! The hosting side speaks axum's WebSocket, the dialing side speaks
//! tokio-tungstenite. Both are mapped onto the same small frame model so a
//! single link implementation serves both.

use axum::extract::ws::Message as AxumMessage;
use tokio_tungstenite::tungstenite::Message as TungsteniteMessage;

/// What a received frame means to a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// Encoded payload bytes
    Data(Vec<u8>),
    /// Ping, pong and raw frames; only reset the read timeout
    Control,
    /// Close frame from the peer
    Close,
}

/// A WebSocket frame type a link can read and write.
pub trait WireMessage: Sized + Send + 'static {
    /// Frame carrying one encoded payload.
    fn data(text: String) -> Self;

    /// Frame sent by an idle writer to keep the peer's read timeout from expiring.
    fn keepalive() -> Self;

    fn into_incoming(self) -> Incoming;
}

impl WireMessage for AxumMessage {
    fn data(text: String) -> Self {
        Self::Text(text.into())
    }

    fn keepalive() -> Self {
        Self::Ping(Default::default())
    }

    fn into_incoming(self) -> Incoming {
        match self {
            Self::Text(text) => Incoming::Data(text.as_str().as_bytes().to_vec()),
            Self::Binary(data) => Incoming::Data(data.to_vec()),
            Self::Close(_) => Incoming::Close,
            _ => Incoming::Control,
        }
    }
}

impl WireMessage for TungsteniteMessage {
    fn data(text: String) -> Self {
        Self::Text(text.into())
    }

    fn keepalive() -> Self {
        Self::Ping(Default::default())
    }

    fn into_incoming(self) -> Incoming {
        match self {
            Self::Text(text) => Incoming::Data(text.as_str().as_bytes().to_vec()),
            Self::Binary(data) => Incoming::Data(data.to_vec()),
            Self::Close(_) => Incoming::Close,
            _ => Incoming::Control,
        }
    }
}
