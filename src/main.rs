//! Organisation dashboard analytics service.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │              DASH ANALYTICS                  │
//!   POST /api/analytics/ │  ┌────────┐   ┌────────────┐                 │
//!   dash ────────────────┼─▶│  http  │──▶│  backend   │── auth/v1 ──────┼──▶ identity
//!                        │  │ server │   │ (identity) │                 │    service
//!                        │  └───┬────┘   └────────────┘                 │
//!                        │      │        ┌────────────┐   stats  ───────┼──▶
//!                        │      └───────▶│ analytics  │── top courses ──┼──▶ PostgREST
//!                        │               │  (join)    │── enrollments ──┼──▶
//!   JSON + cache-control │               └────────────┘                 │
//!   ◀────────────────────┼──                                            │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use dash_analytics::backend::SupabaseClient;
use dash_analytics::config::{self, AppConfig};
use dash_analytics::http::{Backends, HttpServer};
use dash_analytics::lifecycle::Shutdown;
use dash_analytics::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "dash-analytics")]
#[command(about = "Organisation dashboard analytics service", long_about = None)]
struct Cli {
    /// TOML config file. Defaults plus environment overrides are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load(cli: &Cli) -> Result<AppConfig, config::ConfigError> {
    match &cli.config {
        Some(path) => config::load_config(path),
        None => config::load_from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("dash-analytics v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.backend,
        cache_max_age_secs = config.cache.max_age_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation already checked the address when metrics are enabled.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    // One client for the life of the process, shared by every request.
    let client = SupabaseClient::new(&config.backend)?;
    let backends = Backends::supabase(client);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, backends);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
