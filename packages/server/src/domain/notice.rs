//! Messages the room sends on its own behalf.

use onechat_shared::ChatMessage;

/// Sender name used for join and leave announcements.
pub const SERVER_SENDER: &str = "server";

/// `<name> Connected.`
pub fn joined_notice(name: &str) -> ChatMessage {
    ChatMessage::new(SERVER_SENDER, format!("{} Connected.", name))
}

/// `<name> Disconnected.`
pub fn left_notice(name: &str) -> ChatMessage {
    ChatMessage::new(SERVER_SENDER, format!("{} Disconnected.", name))
}
