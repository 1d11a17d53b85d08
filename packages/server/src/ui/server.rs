//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use onechat_shared::TransportConfig;

use crate::{error::ServerError, usecase::Room};

use super::{
    handler::{debug_room_state, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// How often the room drains inbound text and broadcasts it.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Hosting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Period of the room's poll tick
    pub tick_interval: Duration,
    /// Timeouts applied to every accepted connection
    pub transport: TransportConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            transport: TransportConfig::default(),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/debug/room", get(debug_room_state))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A bound, not yet running chat server.
///
/// Binding is separate from running so a process that hosts and joins the
/// same room can dial only after the listener exists.
///
/// # Example
///
/// ```ignore
/// let server = Server::bind("127.0.0.1:8080", ServerConfig::default()).await?;
/// server.run().await?;
/// ```
pub struct Server {
    listener: TcpListener,
    room: Arc<Room>,
    config: ServerConfig,
}

impl Server {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(addr: &str, config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            room: Arc::new(Room::new()),
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// The room hosted by this server
    pub fn room(&self) -> Arc<Room> {
        self.room.clone()
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = self.local_addr()?;
        let app = router(Arc::new(AppState {
            room: self.room.clone(),
            transport: self.config.transport,
        }));

        let updates = tokio::spawn(self.room.clone().run_updates(self.config.tick_interval));

        tracing::info!("Hosting room on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await;
        updates.abort();

        tracing::info!("Server shutdown complete");

        result.map_err(ServerError::Serve)
    }
}
