//! Logging setup

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and
/// `tower_http`. Production logs are emitted as JSON lines.
pub fn init_logger(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("printdock_server={level},tower_http={level}").into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
