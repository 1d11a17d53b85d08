//! Typed WebSocket links.
//!
//! A [`Link`] wraps one WebSocket connection and splits it into:
//!
//! - [`Outbox`]: queues payloads for the writer task
//! - [`Inbox`]: payloads decoded by the reader task, received one at a time
//!   or drained in batches
//! - [`LinkHandle`]: closes the link and exposes its [`LinkStatus`]
//!
//! Every read and write is bounded by the [`TransportConfig`] timeouts. The
//! first failure on either side is recorded as the link's last error and
//! stops both tasks.

pub mod wire;

use std::{fmt, sync::Arc};

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{
    sync::{mpsc, watch},
    task::AbortHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::{config::TransportConfig, error::TransportError, protocol::Payload};

use self::wire::{Incoming, WireMessage};

/// Shared failure state of a link.
#[derive(Debug, Clone)]
pub struct LinkStatus {
    last_error: Arc<watch::Sender<Option<TransportError>>>,
}

impl LinkStatus {
    pub fn new() -> Self {
        let (last_error, _) = watch::channel(None);
        Self {
            last_error: Arc::new(last_error),
        }
    }

    /// Record `reason` unless the link already failed.
    ///
    /// Returns `true` if this call closed the link.
    pub fn fail(&self, reason: TransportError) -> bool {
        self.last_error.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(reason);
            true
        })
    }

    /// The reason the link stopped, if it has.
    pub fn last_error(&self) -> Option<TransportError> {
        self.last_error.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.last_error.borrow().is_some()
    }

    /// Wait until the link fails and return the reason.
    pub async fn closed(&self) -> TransportError {
        let mut rx = self.last_error.subscribe();
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(reason) => reason.clone(),
            Err(_) => None,
        };
        reason.unwrap_or(TransportError::Closed)
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half of a link.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Payload>,
    status: LinkStatus,
}

impl Outbox {
    pub fn new(tx: mpsc::UnboundedSender<Payload>, status: LinkStatus) -> Self {
        Self { tx, status }
    }

    /// Queue `payload` for the writer.
    ///
    /// Fails with the link's last error once the link is closed.
    pub fn send(&self, payload: Payload) -> Result<(), TransportError> {
        if let Some(reason) = self.status.last_error() {
            return Err(reason);
        }
        self.tx.send(payload).map_err(|_| TransportError::Closed)
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }
}

/// Receiving half of a link.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<Payload>,
    status: LinkStatus,
}

impl Inbox {
    pub fn new(rx: mpsc::UnboundedReceiver<Payload>, status: LinkStatus) -> Self {
        Self { rx, status }
    }

    /// Wait for the next payload.
    ///
    /// Payloads that arrived before the link failed are still returned first.
    pub async fn recv(&mut self) -> Result<Payload, TransportError> {
        tokio::select! {
            biased;
            Some(payload) = self.rx.recv() => Ok(payload),
            reason = self.status.closed() => Err(reason),
        }
    }

    /// Take every payload received so far without waiting.
    pub fn drain(&mut self) -> Vec<Payload> {
        let mut batch = Vec::new();
        while let Ok(payload) = self.rx.try_recv() {
            batch.push(payload);
        }
        batch
    }

    /// Like [`Inbox::drain`], but reports the link's failure once nothing is left.
    pub fn recv_batch(&mut self) -> Result<Vec<Payload>, TransportError> {
        let batch = self.drain();
        if batch.is_empty()
            && let Some(reason) = self.status.last_error()
        {
            return Err(reason);
        }
        Ok(batch)
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }
}

/// Controls the tasks behind a link.
#[derive(Debug)]
pub struct LinkHandle {
    status: LinkStatus,
    reader: AbortHandle,
    writer: AbortHandle,
}

impl LinkHandle {
    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    /// Stop both tasks and record `reason` if the link had not failed yet.
    pub fn close(&self, reason: TransportError) {
        self.status.fail(reason);
        self.reader.abort();
        self.writer.abort();
    }
}

/// One open connection: outbox, inbox and the handle to its tasks.
#[derive(Debug)]
pub struct Link {
    outbox: Outbox,
    inbox: Inbox,
    handle: LinkHandle,
}

impl Link {
    /// Start the reader and writer tasks over a split WebSocket.
    pub fn open<M, St, Si, E>(stream: St, sink: Si, config: TransportConfig) -> Self
    where
        M: WireMessage,
        St: Stream<Item = Result<M, E>> + Unpin + Send + 'static,
        E: fmt::Display + Send + 'static,
        Si: Sink<M> + Unpin + Send + 'static,
        Si::Error: fmt::Display + Send,
    {
        let status = LinkStatus::new();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let reader = {
            let status = status.clone();
            tokio::spawn(async move {
                tokio::select! {
                    reason = read_loop(stream, inbound_tx, config) => {
                        tracing::debug!("Link reader stopped: {}", reason);
                        status.fail(reason);
                    }
                    _ = status.closed() => {}
                }
            })
        };

        let writer = {
            let status = status.clone();
            tokio::spawn(async move {
                tokio::select! {
                    reason = write_loop(sink, outbound_rx, config) => {
                        tracing::debug!("Link writer stopped: {}", reason);
                        status.fail(reason);
                    }
                    _ = status.closed() => {}
                }
            })
        };

        Self {
            outbox: Outbox::new(outbound_tx, status.clone()),
            inbox: Inbox::new(inbound_rx, status.clone()),
            handle: LinkHandle {
                status,
                reader: reader.abort_handle(),
                writer: writer.abort_handle(),
            },
        }
    }

    pub fn into_parts(self) -> (Outbox, Inbox, LinkHandle) {
        (self.outbox, self.inbox, self.handle)
    }
}

async fn read_loop<M, St, E>(
    mut stream: St,
    inbound: mpsc::UnboundedSender<Payload>,
    config: TransportConfig,
) -> TransportError
where
    M: WireMessage,
    St: Stream<Item = Result<M, E>> + Unpin,
    E: fmt::Display,
{
    loop {
        let message = match time::timeout(config.read_timeout, stream.next()).await {
            Err(_) => return TransportError::Timeout("read"),
            Ok(None) => return TransportError::PeerClosed,
            Ok(Some(Err(e))) => return TransportError::Connection(e.to_string()),
            Ok(Some(Ok(message))) => message,
        };

        match message.into_incoming() {
            Incoming::Data(bytes) => {
                let payload = match Payload::decode(&bytes) {
                    Ok(payload) => payload,
                    Err(e) => return e,
                };
                // Nobody listening: the payload is dropped, the link stays up.
                if inbound.send(payload).is_err() {
                    tracing::trace!("Dropped payload, inbox is gone");
                }
            }
            Incoming::Control => {}
            Incoming::Close => return TransportError::PeerClosed,
        }
    }
}

async fn write_loop<M, Si>(
    mut sink: Si,
    mut outbound: mpsc::UnboundedReceiver<Payload>,
    config: TransportConfig,
) -> TransportError
where
    M: WireMessage,
    Si: Sink<M> + Unpin,
    Si::Error: fmt::Display,
{
    let mut keepalive = time::interval_at(
        Instant::now() + config.keepalive_interval,
        config.keepalive_interval,
    );
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let message = tokio::select! {
            payload = outbound.recv() => match payload {
                Some(payload) => match payload.encode() {
                    Ok(text) => M::data(text),
                    Err(e) => return e,
                },
                None => {
                    // Every outbox is gone: say goodbye and stop.
                    let _ = time::timeout(config.write_timeout, sink.close()).await;
                    return TransportError::Closed;
                }
            },
            _ = keepalive.tick() => M::keepalive(),
        };

        match time::timeout(config.write_timeout, sink.send(message)).await {
            Err(_) => return TransportError::Timeout("write"),
            Ok(Err(e)) => return TransportError::Connection(e.to_string()),
            Ok(Ok(())) => keepalive.reset(),
        }
    }
}
