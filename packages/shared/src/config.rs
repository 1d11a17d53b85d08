//! Transport configuration.

use std::time::Duration;

/// Read/write timeout applied to every link unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Idle period after which a writer sends a keepalive ping.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(20);

const MIN_KEEPALIVE_INTERVAL: Duration = Duration::from_millis(10);

/// Per-link timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Upper bound for waiting on the next frame
    pub read_timeout: Duration,
    /// Upper bound for flushing one frame
    pub write_timeout: Duration,
    /// How often the writer pings the peer so an idle link stays readable
    pub keepalive_interval: Duration,
}

impl TransportConfig {
    /// Use `timeout` for both directions and ping three times per timeout window.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            read_timeout: timeout,
            write_timeout: timeout,
            keepalive_interval: (timeout / 3).max(MIN_KEEPALIVE_INTERVAL),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
        }
    }
}
