//! bluepacket - BluePacket RPC server
//!
//! Runs the calculator service over the single request/response
//! BluePacket transport.

use bluepacket_calc::{packets, service};
use bluepacket_server::Config;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration (from file if BLUEPACKET_CONFIG is set, then env overrides)
    let config = match Config::load() {
        Ok(c) => {
            if let Ok(path) = std::env::var("BLUEPACKET_CONFIG") {
                tracing::info!("Loaded config from {}", path);
            }
            c
        }
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting bluepacket server");
    tracing::info!("  Bind address: {}", config.network.bind_addr);
    tracing::info!(
        "  Workers: {} (queue capacity {})",
        config.pool.workers,
        config.pool.queue_capacity
    );

    let registry = Arc::new(packets::registry()?);
    tracing::info!("  Registered packets: {}", registry.len());

    let server = Arc::new(service::server(config.server_config(), registry));

    // Spawn shutdown signal handler
    let shutdown_server = server.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received shutdown signal, stopping server...");
        shutdown_server.shutdown();
    });

    // Run server (blocks until shutdown)
    server.run().await?;

    let stats = server.stats();
    tracing::info!(
        "Server stopped ({} connections, {} dropped, {} errors)",
        stats.connections_total.load(Ordering::Relaxed),
        stats.connections_dropped.load(Ordering::Relaxed),
        stats.errors_total.load(Ordering::Relaxed)
    );
    Ok(())
}
