//! Identity registry: who is in the room.
//!
//! Maps a connection id to the display name it authenticated with. The
//! registry itself is not synchronized; the room keeps it behind its lock.

use std::collections::BTreeMap;

use onechat_shared::ConnectionId;

/// Display name reported for ids that are not registered.
pub const UNKNOWN_NAME: &str = "unknown";

/// Connection id -> display name.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    names: BTreeMap<ConnectionId, String>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the name for `id`.
    ///
    /// # Returns
    ///
    /// The name previously registered for `id`, if any
    pub fn put(&mut self, id: ConnectionId, name: String) -> Option<String> {
        self.names.insert(id, name)
    }

    /// The name for `id`, or [`UNKNOWN_NAME`] if it is not registered.
    pub fn get(&self, id: ConnectionId) -> &str {
        self.names.get(&id).map_or(UNKNOWN_NAME, String::as_str)
    }

    /// Remove `id`. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: ConnectionId) -> Option<String> {
        self.names.remove(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Snapshot of all entries sorted by id.
    pub fn entries(&self) -> Vec<(ConnectionId, String)> {
        self.names
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect()
    }
}
