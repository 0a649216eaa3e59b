//! Demo server.
//!
//! Serves a tiny axum router until SIGINT or SIGTERM, then drains.
//!
//! ```text
//! gsrv [--config gsrv.toml] [--address 127.0.0.1:3000]
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::routing::get;
use axum::Router;
use clap::Parser;

use gsrv::config::{load_config, ServerConfig};
use gsrv::observability::logging;
use gsrv::{with_logger, Server, Shutdown, TracingLogger};

#[derive(Debug, Parser)]
#[command(name = "gsrv", version, about = "Serve HTTP with graceful shutdown")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(address) = cli.address {
        config.address = address;
    }

    logging::init(&config.log_level)?;

    tracing::info!(
        address = %config.address,
        shutdown_timeout_secs = config.shutdown_timeout_secs,
        "gsrv v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let server = Server::from_config(&config, [with_logger(Arc::new(TracingLogger))]).await?;

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    server.serve_http(shutdown.token(), router()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/", get(|ConnectInfo(peer): ConnectInfo<SocketAddr>| async move { format!("hello, {peer}\n") }))
        .route("/healthz", get(|| async { "ok\n" }))
}
