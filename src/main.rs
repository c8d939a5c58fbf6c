//! Zstandard-unwrapping HTML relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                    RELAY                     │
//!                        │                                              │
//!   GET /api/{*target}   │  ┌─────────┐   ┌─────────┐   ┌───────────┐  │
//!   ─────────────────────┼─▶│  http   │──▶│ target  │──▶│   fetch   │──┼──▶ Upstream
//!                        │  │ server  │   │resolver │   │  engine   │  │    origin
//!                        │  └─────────┘   └─────────┘   └─────┬─────┘  │
//!                        │                                    │        │
//!                        │                                    ▼        │
//!   200 text/html        │  ┌─────────┐   ┌─────────┐   ┌───────────┐  │
//!   ◀────────────────────┼──│response │◀──│ rewrite │◀──│decompress │◀─┼──── body
//!                        │  └─────────┘   └─────────┘   └───────────┘  │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! Each request runs the pipeline above independently; nothing is shared
//! between requests except the HTTP client handle and the compiled
//! rewriter, both immutable.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use zstd_relay::config::loader::load_config;
use zstd_relay::config::RelayConfig;
use zstd_relay::http::HttpServer;
use zstd_relay::lifecycle::Shutdown;
use zstd_relay::observability;

#[derive(Parser)]
#[command(name = "zstd-relay")]
#[command(about = "HTTP relay that unwraps Zstandard-compressed upstream documents", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address from the config.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    observability::logging::init(&config.observability.log_level);

    tracing::info!("zstd-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        source_origin = %config.rewrite.source_origin,
        alias_origin = %config.rewrite.alias_origin,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics server
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
