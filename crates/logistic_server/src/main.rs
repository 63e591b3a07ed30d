// Entry point: serves the dashboard page and its recompute endpoint.
mod cli;
mod config;
mod routes;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use config::ServerConfig;
use routes::{normalize_prefix, router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log.as_str())
        .with_target(false)
        .compact()
        .init();

    let config = ServerConfig::load(args.config.as_deref())?;
    info!(
        samples = config.dashboard.grid.samples,
        method = ?config.dashboard.solver.method,
        "dashboard configured"
    );

    let app = router(AppState::new(config.dashboard), &args.prefix);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        "serving http://{}{}",
        addr,
        normalize_prefix(&args.prefix)
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "failed to listen for ctrl-c");
    }
}
