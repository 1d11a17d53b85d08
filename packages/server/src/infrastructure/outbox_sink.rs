//! Link outboxes as broadcast recipients.
//!
//! A push only queues the payload for the link's writer task, so it never
//! waits on the network while the room lock is held.

use onechat_shared::{Payload, TransportError, transport::Outbox};

use crate::domain::MessageSink;

impl MessageSink for Outbox {
    fn push(&self, payload: Payload) -> Result<(), TransportError> {
        self.send(payload)
    }
}
