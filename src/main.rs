//! Cryptfall Pose Relay
//!
//! Standalone relay binary: accepts WebSocket connections, groups them
//! into rooms, and rebroadcasts each member's pose stream to the rest of
//! the room.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cryptfall::net::relay::{RelayConfig, RelayServer};
use cryptfall::{SEND_RATE, SERIALIZATION_RATE, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RelayConfig::default();
    if let Ok(addr) = std::env::var("CRYPTFALL_RELAY_ADDR") {
        config.bind_addr = addr
            .parse()
            .context("invalid CRYPTFALL_RELAY_ADDR address")?;
    }

    info!("Cryptfall Pose Relay v{}", VERSION);
    info!("Send Rate: {} Hz", SEND_RATE);
    info!("Serialization Rate: {} Hz", SERIALIZATION_RATE);
    info!("Binding {}", config.bind_addr);

    let relay = RelayServer::new(config);

    tokio::select! {
        result = relay.run() => {
            result.context("relay stopped with error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            relay.shutdown();
        }
    }

    Ok(())
}
