//! Broadcast dispatcher.
//!
//! Delivers one chat message to every recipient of a participant set. A
//! failed delivery is logged and reported, never raised: the recipient's own
//! link failure will take it through the normal disconnect path.

use onechat_shared::{ChatMessage, ConnectionId, Payload, TransportError};

/// Something a payload can be pushed to without waiting.
#[cfg_attr(test, mockall::automock)]
pub trait MessageSink {
    fn push(&self, payload: Payload) -> Result<(), TransportError>;
}

/// Outcome of one broadcast.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of recipients a delivery was attempted for
    pub attempted: usize,
    /// Recipients whose delivery failed
    pub failed: Vec<ConnectionId>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed.len()
    }
}

/// Deliver `message` to every recipient.
///
/// # Arguments
///
/// * `recipients` - Participant set as (connection id, sink) pairs
/// * `message` - The chat message to deliver
///
/// # Returns
///
/// One attempt per recipient, with the ids whose delivery failed
pub fn broadcast<'a, S, I>(recipients: I, message: &ChatMessage) -> DeliveryReport
where
    S: MessageSink + 'a,
    I: IntoIterator<Item = (ConnectionId, &'a S)>,
{
    let mut report = DeliveryReport::default();

    for (id, sink) in recipients {
        report.attempted += 1;
        if let Err(e) = sink.push(Payload::ChatMessage(message.clone())) {
            tracing::warn!("Failed to deliver message to connection {}: {}", id, e);
            report.failed.push(id);
        }
    }

    tracing::debug!(
        "Broadcasted message from '{}' to {} of {} participants",
        message.sender,
        report.delivered(),
        report.attempted
    );

    report
}
