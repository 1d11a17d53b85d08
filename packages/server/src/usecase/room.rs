//! UseCase: ルームと接続のライフサイクル
//!
//! ## 責務
//!
//! - 認証: 名前を登録し、参加通知をブロードキャストし、`AuthResponse` を返す
//! - 更新 (poll tick): 全参加者の受信済みテキストを取り出し、チャットとして配信
//! - 切断: 未配信のテキストを流し、退出通知をブロードキャストしてから登録を削除
//!   (認証前の接続は "unknown" として退出を通知)
//!
//! ## 排他制御
//!
//! Identity Registry と配信先の集合は 1 つの `Mutex` で保護されます。
//! 「登録の変更 + ブロードキャスト」は常にこのロックを保持したまま行われるため、
//! 他の接続の参加・退出が配信の途中に割り込むことはありません。

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::Mutex,
    time::{self, MissedTickBehavior},
};

use onechat_shared::{
    ChatMessage, ConnectionId, Payload, TransportError,
    transport::{Inbox, Outbox},
};

use crate::domain::{DeliveryReport, IdentityRegistry, broadcast, joined_notice, left_notice};

/// An authenticated connection as seen by the room.
#[derive(Debug)]
struct Peer {
    outbox: Outbox,
    inbox: Inbox,
}

#[derive(Debug, Default)]
struct RoomState {
    registry: IdentityRegistry,
    /// Delivery set; holds exactly the registered ids
    peers: BTreeMap<ConnectionId, Peer>,
}

impl RoomState {
    fn broadcast(&self, message: &ChatMessage) -> DeliveryReport {
        broadcast(
            self.peers.iter().map(|(id, peer)| (*id, &peer.outbox)),
            message,
        )
    }
}

/// The single chat room hosted by this process.
#[derive(Debug)]
pub struct Room {
    state: Mutex<RoomState>,
    next_id: AtomicU64,
}

impl Room {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RoomState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Assign an id to a freshly accepted connection. Ids are never reused.
    pub fn allocate_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Move a connection from `Authenticating` to `Active`.
    ///
    /// In order: register `name`, broadcast the join notice (the new
    /// participant included), answer with `AuthResponse`.
    ///
    /// # Errors
    ///
    /// Returns the link's error if the `AuthResponse` cannot be sent. The
    /// participant is then dropped without a leave notice and the caller
    /// closes the connection.
    pub async fn authenticate(
        &self,
        id: ConnectionId,
        name: String,
        outbox: Outbox,
        inbox: Inbox,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;

        state.registry.put(id, name.clone());
        state.peers.insert(
            id,
            Peer {
                outbox: outbox.clone(),
                inbox,
            },
        );
        tracing::info!("{} (ID: {}) Connected.", name, id);
        state.broadcast(&joined_notice(&name));

        if let Err(e) = outbox.send(Payload::AuthResponse { id }) {
            // The join notice already went out; leave without a notice.
            state.peers.remove(&id);
            state.registry.remove(id);
            return Err(e);
        }

        Ok(())
    }

    /// One poll tick: broadcast every text payload received since the last tick.
    ///
    /// # Returns
    ///
    /// The number of chat messages broadcast
    pub async fn update(&self) -> usize {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let mut messages = Vec::new();
        for (id, peer) in state.peers.iter_mut() {
            for payload in peer.inbox.drain() {
                match payload {
                    Payload::Text(text) => {
                        messages.push(ChatMessage::new(state.registry.get(*id), text));
                    }
                    other => {
                        tracing::debug!(
                            "Ignoring {} payload from connection {}",
                            other.kind(),
                            id
                        );
                    }
                }
            }
        }

        for message in &messages {
            state.broadcast(message);
        }

        messages.len()
    }

    /// Move an active connection to `Closed`.
    ///
    /// Text still queued on the link goes out first under the participant's
    /// name. Then everyone left gets `<name> Disconnected.`, with the name
    /// resolved before the entry is removed.
    ///
    /// # Returns
    ///
    /// `true` if the connection was an active participant
    pub async fn disconnect(&self, id: ConnectionId, reason: &TransportError) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let Some(mut peer) = state.peers.remove(&id) else {
            return false;
        };

        let name = state.registry.get(id).to_string();
        for payload in peer.inbox.drain() {
            if let Payload::Text(text) = payload {
                state.broadcast(&ChatMessage::new(name.clone(), text));
            }
        }

        tracing::info!("{} (ID: {}) Disconnected. Reason: {}", name, id, reason);
        state.broadcast(&left_notice(&name));
        state.registry.remove(id);

        true
    }

    /// Move a connection that never authenticated to `Closed`.
    ///
    /// The departure is announced like any other; the id was never
    /// registered, so the notice carries the unknown sentinel.
    pub async fn disconnect_unauthenticated(&self, id: ConnectionId, reason: &TransportError) {
        let state = self.state.lock().await;

        let name = state.registry.get(id).to_string();
        tracing::info!("Unauthenticated connection {} closed: {}", id, reason);
        state.broadcast(&left_notice(&name));
    }

    /// Display name of `id`, or the unknown sentinel.
    pub async fn display_name(&self, id: ConnectionId) -> String {
        self.state.lock().await.registry.get(id).to_string()
    }

    /// Registered participants sorted by id.
    pub async fn participants(&self) -> Vec<(ConnectionId, String)> {
        self.state.lock().await.registry.entries()
    }

    pub async fn participant_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    /// Run [`Room::update`] every `period` until the task is aborted.
    pub async fn run_updates(self: Arc<Self>, period: Duration) {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.update().await;
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
