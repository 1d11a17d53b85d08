//! End-to-end tests: a real room on an ephemeral port, driven over WebSocket.

use std::time::Duration;

use tokio::{sync::oneshot, task::JoinHandle};

use onechat_client::{Session, connection::dial};
use onechat_server::{Server, ServerConfig};
use onechat_shared::{
    ChatMessage, ConnectionId, Payload, TransportConfig, TransportError,
    transport::{Inbox, LinkHandle, Outbox},
};

const WAIT: Duration = Duration::from_secs(5);

/// Helper struct to manage a hosted room for one test
struct TestRoom {
    addr: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TestRoom {
    async fn start() -> Self {
        let config = ServerConfig {
            tick_interval: Duration::from_millis(10),
            ..ServerConfig::default()
        };
        let server = Server::bind("127.0.0.1:0", config).await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            server
                .run_until(async {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        TestRoom {
            addr,
            shutdown: Some(shutdown),
            task,
        }
    }

    async fn participants(&self) -> serde_json::Value {
        reqwest::get(format!("http://{}/debug/room", self.addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = tokio::time::timeout(WAIT, &mut self.task).await;
    }
}

/// A raw participant that reads payloads one by one
struct TestPeer {
    outbox: Outbox,
    inbox: Inbox,
    handle: LinkHandle,
}

impl TestPeer {
    async fn connect(room: &TestRoom) -> Self {
        let link = dial(&room.addr, TransportConfig::default()).await.unwrap();
        let (outbox, inbox, handle) = link.into_parts();
        TestPeer {
            outbox,
            inbox,
            handle,
        }
    }

    /// Connect and authenticate, consuming the join notice and the response.
    async fn join(room: &TestRoom, name: &str) -> (Self, ConnectionId) {
        let mut peer = Self::connect(room).await;
        peer.send(Payload::AuthRequest {
            name: name.to_string(),
        });
        assert_eq!(peer.next().await, joined(name));
        let id = match peer.next().await {
            Payload::AuthResponse { id } => id,
            other => panic!("expected auth-response, got {:?}", other),
        };
        (peer, id)
    }

    fn send(&self, payload: Payload) {
        self.outbox.send(payload).unwrap();
    }

    async fn next(&mut self) -> Payload {
        tokio::time::timeout(WAIT, self.inbox.recv())
            .await
            .expect("timed out waiting for a payload")
            .unwrap()
    }

    /// Drop every outbox so the writer sends a close frame.
    fn leave(self) {
        drop(self);
    }
}

fn joined(name: &str) -> Payload {
    Payload::ChatMessage(ChatMessage::new("server", format!("{} Connected.", name)))
}

fn left(name: &str) -> Payload {
    Payload::ChatMessage(ChatMessage::new("server", format!("{} Disconnected.", name)))
}

#[tokio::test]
async fn test_two_participants_chat_and_one_leaves() {
    // テスト項目: alice と bob が参加し、bob の発言が両者に届き、bob の退出が alice に通知される
    // given (前提条件):
    let room = TestRoom::start().await;
    let (mut alice, alice_id) = TestPeer::join(&room, "alice").await;
    let (mut bob, bob_id) = TestPeer::join(&room, "bob").await;
    assert_eq!(alice.next().await, joined("bob"));
    assert_ne!(alice_id, bob_id);

    // when (操作):
    bob.send(Payload::Text("hi".to_string()));

    // then (期待する結果):
    let hi = Payload::ChatMessage(ChatMessage::new("bob", "hi"));
    assert_eq!(alice.next().await, hi);
    assert_eq!(bob.next().await, hi);

    // bob が退出すると alice にだけ通知が届く
    bob.leave();
    assert_eq!(alice.next().await, left("bob"));
    assert_eq!(
        room.participants().await,
        serde_json::json!({
            "participants": [{ "id": alice_id.value(), "name": "alice" }]
        })
    );

    room.stop().await;
}

#[tokio::test]
async fn test_messages_from_one_sender_keep_their_order() {
    // テスト項目: 1 人の参加者が続けて送ったメッセージは送信順に配信される
    // given (前提条件):
    let room = TestRoom::start().await;
    let (mut alice, _) = TestPeer::join(&room, "alice").await;

    // when (操作):
    for text in ["one", "two", "three"] {
        alice.send(Payload::Text(text.to_string()));
    }

    // then (期待する結果):
    for text in ["one", "two", "three"] {
        assert_eq!(
            alice.next().await,
            Payload::ChatMessage(ChatMessage::new("alice", text))
        );
    }

    room.stop().await;
}

#[tokio::test]
async fn test_connection_without_auth_request_is_ignored() {
    // テスト項目: AuthRequest 以外を最初に送った接続は登録されず、他の参加者にも影響しない
    // given (前提条件):
    let room = TestRoom::start().await;
    let (mut alice, alice_id) = TestPeer::join(&room, "alice").await;
    let stranger = TestPeer::connect(&room).await;

    // when (操作):
    stranger.send(Payload::Text("let me in".to_string()));
    tokio::time::sleep(Duration::from_millis(100)).await;
    alice.send(Payload::Text("anyone?".to_string()));

    // then (期待する結果):
    assert_eq!(
        alice.next().await,
        Payload::ChatMessage(ChatMessage::new("alice", "anyone?"))
    );
    assert_eq!(
        room.participants().await,
        serde_json::json!({
            "participants": [{ "id": alice_id.value(), "name": "alice" }]
        })
    );

    // 未認証の接続が切れると "unknown" の退出として通知される
    stranger.leave();
    assert_eq!(alice.next().await, left("unknown"));
    alice.send(Payload::Text("still here".to_string()));
    assert_eq!(
        alice.next().await,
        Payload::ChatMessage(ChatMessage::new("alice", "still here"))
    );

    room.stop().await;
}

#[tokio::test]
async fn test_last_message_before_leaving_is_delivered() {
    // テスト項目: 退出直前に送ったメッセージも退出通知より先に届く
    // given (前提条件):
    let room = TestRoom::start().await;
    let (mut alice, _) = TestPeer::join(&room, "alice").await;
    let (bob, _) = TestPeer::join(&room, "bob").await;
    assert_eq!(alice.next().await, joined("bob"));

    // when (操作):
    bob.send(Payload::Text("bye".to_string()));
    bob.leave();

    // then (期待する結果):
    assert_eq!(
        alice.next().await,
        Payload::ChatMessage(ChatMessage::new("bob", "bye"))
    );
    assert_eq!(alice.next().await, left("bob"));

    room.stop().await;
}

#[tokio::test]
async fn test_session_handshake_against_room() {
    // テスト項目: クライアントセッションのハンドシェイクで最初に届く参加通知が失われない
    // given (前提条件):
    let room = TestRoom::start().await;
    let link = dial(&room.addr, TransportConfig::default()).await.unwrap();

    // when (操作):
    let session = Session::handshake(link, "carol").await.unwrap();
    let (receiver, _sender, handle) = session.into_loops(Duration::from_millis(10));
    let (lines_tx, mut lines) = tokio::sync::mpsc::unbounded_channel();
    let receiving = tokio::spawn(receiver.run(move |line| {
        let _ = lines_tx.send(line);
    }));

    // then (期待する結果):
    let mut seen = Vec::new();
    while seen.len() < 2 {
        let line = tokio::time::timeout(WAIT, lines.recv())
            .await
            .expect("timed out waiting for output")
            .unwrap();
        seen.push(line);
    }
    assert_eq!(seen, ["server: carol Connected.", "UserID: 1"]);

    handle.close(TransportError::Closed);
    assert_eq!(
        tokio::time::timeout(WAIT, receiving).await.unwrap().unwrap(),
        TransportError::Closed
    );
    room.stop().await;
}

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: ヘルスチェックエンドポイントが ok を返す
    // given (前提条件):
    let room = TestRoom::start().await;

    // when (操作):
    let response = reqwest::get(format!("http://{}/api/health", room.addr))
        .await
        .unwrap();

    // then (期待する結果):
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "status": "ok" }));

    room.stop().await;
}
