//! Shared application state.

use std::sync::Arc;

use onechat_shared::TransportConfig;

use crate::usecase::Room;

/// State handed to every handler
pub struct AppState {
    /// The hosted room
    pub room: Arc<Room>,
    /// Timeouts applied to every accepted connection
    pub transport: TransportConfig,
}
