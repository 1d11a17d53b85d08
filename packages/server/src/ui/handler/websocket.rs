//! WebSocket connection handlers.
//!
//! Each accepted connection runs through `Connecting -> Authenticating ->
//! Active -> Closed`:
//!
//! - the first payload must be an `AuthRequest`; anything else is ignored and
//!   the connection is left to time out
//! - once active, inbound text is picked up by the room's poll tick
//! - the first transport failure closes the connection and triggers the
//!   leave notice; connections that never authenticated leave as `unknown`
//! - a failed `AuthResponse` closes the connection without a leave notice

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::StreamExt;

use onechat_shared::{ConnectionId, Payload, transport::Link};

use crate::{ui::state::AppState, usecase::Room};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let id = state.room.allocate_id();
    let (sender, receiver) = socket.split();
    let link = Link::open(receiver, sender, state.transport);
    tracing::debug!("Connection {} accepted", id);

    serve_connection(&state.room, id, link).await;
}

/// Drive one connection through its lifecycle until it closes.
pub async fn serve_connection(room: &Room, id: ConnectionId, link: Link) {
    let (outbox, mut inbox, handle) = link.into_parts();

    let first = match inbox.recv().await {
        Ok(payload) => payload,
        Err(reason) => {
            room.disconnect_unauthenticated(id, &reason).await;
            handle.close(reason);
            return;
        }
    };

    let name = match first {
        Payload::AuthRequest { name } => name,
        other => {
            // No response and no error: the peer stays unauthenticated until
            // the link fails or times out.
            tracing::debug!(
                "Connection {} sent {} instead of auth-request, ignoring it",
                id,
                other.kind()
            );
            drop(inbox);
            let reason = handle.status().closed().await;
            room.disconnect_unauthenticated(id, &reason).await;
            drop(outbox);
            return;
        }
    };

    if let Err(reason) = room.authenticate(id, name, outbox, inbox).await {
        tracing::warn!(
            "Failed to send auth-response to connection {}: {}",
            id,
            reason
        );
        handle.close(reason);
        return;
    }

    let reason = handle.status().closed().await;
    room.disconnect(id, &reason).await;
    handle.close(reason);
}
