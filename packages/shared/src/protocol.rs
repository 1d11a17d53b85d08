//! Payload kinds exchanged between a room and its clients.
//!
//! Every frame on the wire carries exactly one [`Payload`], encoded as JSON:
//!
//! ```text
//! {"type":"auth-request","data":{"name":"alice"}}
//! {"type":"auth-response","data":{"id":1}}
//! {"type":"chat-message","data":{"sender":"alice","text":"hi"}}
//! {"type":"text","data":"hi"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Identifier the hosting side assigns to an accepted connection.
///
/// Stable for the connection's lifetime and never reused while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line of chat attributed to a sender's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Everything that can travel over a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Payload {
    /// Client -> server, first payload of a connection
    AuthRequest { name: String },
    /// Server -> client, answers a successful `AuthRequest`
    AuthResponse { id: ConnectionId },
    /// Server -> client, one broadcast chat line
    ChatMessage(ChatMessage),
    /// Client -> server, one line typed by the user
    Text(String),
}

impl Payload {
    /// Short name of the payload kind, used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthRequest { .. } => "auth-request",
            Self::AuthResponse { .. } => "auth-response",
            Self::ChatMessage(_) => "chat-message",
            Self::Text(_) => "text",
        }
    }

    pub fn encode(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TransportError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl From<ChatMessage> for Payload {
    fn from(message: ChatMessage) -> Self {
        Self::ChatMessage(message)
    }
}
