//! Client session: handshake, receive loop and send loop.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use onechat_shared::{
    ConnectionId, Payload, TransportConfig, TransportError,
    transport::{Inbox, Link, LinkHandle, Outbox},
};

use crate::{error::ClientError, formatter::MessageFormatter, input::InputEvent};

/// How often the receive loop drains the link.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Client configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Period of the receive loop
    pub poll_interval: Duration,
    /// Timeouts applied to the link
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            transport: TransportConfig::default(),
        }
    }
}

/// An authenticated link to a room.
#[derive(Debug)]
pub struct Session {
    outbox: Outbox,
    inbox: Inbox,
    handle: LinkHandle,
    user_id: Option<ConnectionId>,
    /// First payload of the handshake when it was not an `AuthResponse`
    pending: Option<Payload>,
}

impl Session {
    /// Send `AuthRequest{name}` and wait for exactly one payload.
    ///
    /// An `AuthResponse` records the assigned id. Any other payload is kept
    /// and shown first by the receive loop.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Handshake`] if the link fails before a payload arrives.
    pub async fn handshake(link: Link, name: &str) -> Result<Self, ClientError> {
        let (outbox, mut inbox, handle) = link.into_parts();

        outbox
            .send(Payload::AuthRequest {
                name: name.to_string(),
            })
            .map_err(ClientError::Handshake)?;

        let (user_id, pending) = match inbox.recv().await.map_err(ClientError::Handshake)? {
            Payload::AuthResponse { id } => (Some(id), None),
            other => {
                tracing::debug!("Expected auth-response, got {}", other.kind());
                (None, Some(other))
            }
        };

        Ok(Self {
            outbox,
            inbox,
            handle,
            user_id,
            pending,
        })
    }

    /// Id assigned by the room, if the handshake answer carried it.
    pub fn user_id(&self) -> Option<ConnectionId> {
        self.user_id
    }

    /// Split into the two loops and the handle that closes the link.
    pub fn into_loops(self, poll_interval: Duration) -> (ReceiveLoop, SendLoop, LinkHandle) {
        (
            ReceiveLoop {
                inbox: self.inbox,
                pending: self.pending,
                poll_interval,
            },
            SendLoop {
                outbox: self.outbox,
            },
            self.handle,
        )
    }
}

/// Polls the link on a fixed period and renders what arrived.
#[derive(Debug)]
pub struct ReceiveLoop {
    inbox: Inbox,
    pending: Option<Payload>,
    poll_interval: Duration,
}

impl ReceiveLoop {
    /// Run until the link fails.
    ///
    /// # Returns
    ///
    /// The transport error that ended the loop
    pub async fn run<R>(mut self, mut render: R) -> TransportError
    where
        R: FnMut(String),
    {
        if let Some(payload) = self.pending.take() {
            render(MessageFormatter::format_payload(&payload));
        }

        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.inbox.recv_batch() {
                Ok(batch) => {
                    for payload in &batch {
                        render(MessageFormatter::format_payload(payload));
                    }
                }
                Err(reason) => return reason,
            }
        }
    }
}

/// Why the send loop stopped without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// Input is exhausted; receiving goes on
    Eof,
    /// The user asked to quit
    Interrupted,
}

/// Forwards local lines as text payloads.
#[derive(Debug)]
pub struct SendLoop {
    outbox: Outbox,
}

impl SendLoop {
    /// Send one line with its trailing terminator removed.
    pub fn send_line(&self, line: &str) -> Result<(), TransportError> {
        self.outbox
            .send(Payload::Text(strip_line_terminator(line).to_string()))
    }

    /// Forward input events until input ends.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] if a line cannot be sent,
    /// [`ClientError::Input`] if the terminal fails.
    pub async fn run(
        &self,
        events: &mut mpsc::UnboundedReceiver<InputEvent>,
    ) -> Result<InputEnd, ClientError> {
        while let Some(event) = events.recv().await {
            match event {
                InputEvent::Line(line) => self.send_line(&line)?,
                InputEvent::Eof => return Ok(InputEnd::Eof),
                InputEvent::Interrupted => return Ok(InputEnd::Interrupted),
                InputEvent::Failed(e) => return Err(ClientError::Input(e)),
            }
        }
        Ok(InputEnd::Eof)
    }
}

/// Remove one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(line)
}
