//! Chat Relay Server binary.
//!
//! Configuration is resolved before logging exists, so a bad config file is
//! reported on stderr by the `anyhow` error returned from `main`.

use chat_relay_server::config::{Config, LoggingConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default()?;
    init_logging(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        log_format = %config.logging.format,
        "Starting Chat Relay Server"
    );

    chat_relay_server::run(config).await
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `[logging] level`.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}
