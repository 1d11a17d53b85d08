//! Message formatting utilities for client display.

use onechat_shared::{ChatMessage, ConnectionId, Payload};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// `<sender>: <text>`
    pub fn format_chat_message(message: &ChatMessage) -> String {
        format!("{}: {}", message.sender, message.text)
    }

    /// Line shown once the room assigned us an id
    pub fn format_user_id(id: ConnectionId) -> String {
        format!("UserID: {}", id)
    }

    /// Diagnostic fallback for payloads a client does not expect
    pub fn format_unexpected(payload: &Payload) -> String {
        format!("[unexpected {}] {:?}", payload.kind(), payload)
    }

    /// Render any received payload as one line
    pub fn format_payload(payload: &Payload) -> String {
        match payload {
            Payload::ChatMessage(message) => Self::format_chat_message(message),
            Payload::AuthResponse { id } => Self::format_user_id(*id),
            other => Self::format_unexpected(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージが "<sender>: <text>" で表示される
        // given (前提条件):
        let payload = Payload::ChatMessage(ChatMessage::new("alice", "hi"));

        // when (操作):
        let line = MessageFormatter::format_payload(&payload);

        // then (期待する結果):
        assert_eq!(line, "alice: hi");
    }

    #[test]
    fn test_format_server_notice() {
        // テスト項目: server からの通知も同じ形式で表示される
        // given (前提条件):
        let payload = Payload::ChatMessage(ChatMessage::new("server", "bob Disconnected."));

        // when (操作):
        let line = MessageFormatter::format_payload(&payload);

        // then (期待する結果):
        assert_eq!(line, "server: bob Disconnected.");
    }

    #[test]
    fn test_format_auth_response() {
        // テスト項目: AuthResponse は割り当てられた UserID として表示される
        // given (前提条件):
        let payload = Payload::AuthResponse {
            id: ConnectionId::new(12),
        };

        // when (操作):
        let line = MessageFormatter::format_payload(&payload);

        // then (期待する結果):
        assert_eq!(line, "UserID: 12");
    }

    #[test]
    fn test_format_unexpected_payload() {
        // テスト項目: 想定外のペイロードは種類付きの診断表示になる
        // given (前提条件):
        let payload = Payload::Text("raw".to_string());

        // when (操作):
        let line = MessageFormatter::format_payload(&payload);

        // then (期待する結果):
        assert_eq!(line, r#"[unexpected text] Text("raw")"#);
    }
}
