//! Command line arguments of the `onechat` binary.

use std::{ffi::OsString, time::Duration};

use clap::Parser;

use onechat_server::ServerConfig;
use onechat_shared::TransportConfig;

use crate::session::ClientConfig;

pub const DEFAULT_NAME: &str = "idiot";

pub const USAGE: &str =
    "You need to either host or connect. Use '-serve <addr>' to host or '-conn <addr>' to connect.";

/// Long flags that are also accepted with a single dash.
const LONG_FLAGS: [&str; 5] = ["serve", "conn", "name", "timeout-secs", "tick-ms"];

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "onechat")]
#[command(about = "Host and/or join a single chat room", long_about = None)]
pub struct Args {
    /// Host a room at this address (host:port)
    #[arg(long, value_name = "ADDR")]
    pub serve: Option<String>,

    /// Connect to the room at this address (host:port or ws:// URL)
    #[arg(long, value_name = "ADDR")]
    pub conn: Option<String>,

    /// Display name shown to other participants
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// Read/write timeout of every connection, in seconds
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Poll period of the room and the client, in milliseconds
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,
}

impl Args {
    /// Parse the process arguments, accepting `-serve` as well as `--serve`.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(Duration::from_secs(self.timeout_secs))
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            tick_interval: self.tick(),
            transport: self.transport(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            poll_interval: self.tick(),
            transport: self.transport(),
        }
    }
}

/// Rewrite single-dash long flags (`-serve`, `-name=bob`) to their
/// double-dash form. Everything else is passed through.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let flag = rest.split_once('=').map_or(rest, |(flag, _)| flag);
            if LONG_FLAGS.contains(&flag) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(normalize_args(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_dash_flags_are_accepted() {
        // テスト項目: -serve / -conn / -name の 1 文字ダッシュ形式が受け付けられる
        // given (前提条件):
        let args = ["onechat", "-serve", ":8080", "-conn", "localhost:8080", "-name", "alice"];

        // when (操作):
        let parsed = parse(&args);

        // then (期待する結果):
        assert_eq!(parsed.serve.as_deref(), Some(":8080"));
        assert_eq!(parsed.conn.as_deref(), Some("localhost:8080"));
        assert_eq!(parsed.name, "alice");
    }

    #[test]
    fn test_double_dash_and_equals_forms() {
        // テスト項目: --flag 形式と -flag=value 形式も受け付けられる
        // given (前提条件):
        let args = ["onechat", "--conn", "127.0.0.1:9000", "-name=bob", "-tick-ms=20"];

        // when (操作):
        let parsed = parse(&args);

        // then (期待する結果):
        assert_eq!(parsed.conn.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(parsed.name, "bob");
        assert_eq!(parsed.tick_ms, 20);
    }

    #[test]
    fn test_defaults() {
        // テスト項目: 何も指定しない場合のデフォルト値
        // given (前提条件):
        let args = ["onechat"];

        // when (操作):
        let parsed = parse(&args);

        // then (期待する結果):
        assert_eq!(parsed.serve, None);
        assert_eq!(parsed.conn, None);
        assert_eq!(parsed.name, DEFAULT_NAME);
        assert_eq!(parsed.server_config(), ServerConfig::default());
        assert_eq!(parsed.client_config(), ClientConfig::default());
    }

    #[test]
    fn test_timeout_flag_reaches_both_configs() {
        // テスト項目: --timeout-secs がサーバーとクライアント両方の設定に反映される
        // given (前提条件):
        let args = ["onechat", "-timeout-secs", "5"];

        // when (操作):
        let parsed = parse(&args);

        // then (期待する結果):
        assert_eq!(
            parsed.server_config().transport.read_timeout,
            Duration::from_secs(5)
        );
        assert_eq!(
            parsed.client_config().transport.write_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        // テスト項目: タイムアウト 0 秒は不正な値として拒否される
        // given (前提条件):
        let args = normalize_args(["onechat", "--timeout-secs", "0"]);

        // when (操作):
        let result = Args::try_parse_from(args);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_single_dash_args_pass_through() {
        // テスト項目: 既知のフラグ以外の引数や値は書き換えられない
        // given (前提条件):
        let args = ["onechat", "-h", "-x", "-", "value"];

        // when (操作):
        let normalized = normalize_args(args);

        // then (期待する結果):
        assert_eq!(normalized, args.map(OsString::from).to_vec());
    }
}
