//! Logging setup for the onechat binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LIBRARY_TARGETS: [&str; 3] = ["onechat_shared", "onechat_server", "onechat_client"];

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
/// Logs are written to stderr so stdout only carries chat output.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "onechat")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use onechat_shared::logger::setup_logger;
///
/// setup_logger("onechat", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    LIBRARY_TARGETS
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
