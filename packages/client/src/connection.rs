//! Dialing a room.

use futures_util::StreamExt;
use tokio::time;
use tokio_tungstenite::connect_async;

use onechat_shared::{TransportConfig, transport::Link};

use crate::error::ClientError;

/// WebSocket URL for a room address.
///
/// `host:port` maps to `ws://host:port/ws`; full `ws://` and `wss://` URLs
/// are used as given.
pub fn room_url(addr: &str) -> String {
    if addr.starts_with("ws://") || addr.starts_with("wss://") {
        addr.to_string()
    } else {
        format!("ws://{}/ws", addr)
    }
}

/// Open a link to the room at `addr`.
///
/// The opening handshake is bounded by the write timeout.
pub async fn dial(addr: &str, config: TransportConfig) -> Result<Link, ClientError> {
    let url = room_url(addr);

    let (ws_stream, _response) = time::timeout(config.write_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| ClientError::Dial {
            url: url.clone(),
            reason: "timed out".to_string(),
        })?
        .map_err(|e| ClientError::Dial {
            url: url.clone(),
            reason: e.to_string(),
        })?;

    tracing::info!("Connected to {}", url);

    let (write, read) = ws_stream.split();
    Ok(Link::open(read, write, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_url_from_host_and_port() {
        // テスト項目: host:port 形式のアドレスが /ws の URL に変換される
        // given (前提条件):
        let addr = "127.0.0.1:8080";

        // when (操作):
        let url = room_url(addr);

        // then (期待する結果):
        assert_eq!(url, "ws://127.0.0.1:8080/ws");
    }

    #[test]
    fn test_room_url_keeps_full_url() {
        // テスト項目: ws:// で始まる URL はそのまま使われる
        // given (前提条件):
        let addr = "ws://example.com:9000/room";

        // when (操作):
        let url = room_url(addr);

        // then (期待する結果):
        assert_eq!(url, addr);
    }

    #[tokio::test]
    async fn test_dial_refused_is_dial_error() {
        // テスト項目: 接続できないアドレスへの dial は Dial エラーになる
        // given (前提条件):
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        // when (操作):
        let result = dial(&addr, TransportConfig::default()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Dial { .. })));
    }
}
