//! Round-robin reverse-proxy load balancer.
//!
//! Accepts inbound HTTP requests, resolves the target pool by exact request
//! path (or a single flat pool), rotates to the next candidate backend,
//! gates it through a health probe, and forwards the first healthy one.
//! Exhausting the pool, or an unmatched path, answers 503.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rrproxy::config::load_config;
use rrproxy::http::HttpServer;
use rrproxy::lifecycle::Shutdown;
use rrproxy::observability;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "rrproxy", about = "Round-robin reverse-proxy load balancer")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        routes = config.routes.len(),
        probe_mode = ?config.health_check.mode,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, shutting down");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
