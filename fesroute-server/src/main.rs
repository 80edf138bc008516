mod api;
mod config;
mod error;
mod state;

use std::path::PathBuf;

use clap::Parser;
use fesroute_core::prelude::load_axes;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::{AppState, Snapshot};

/// Traffic-aware routing server for the Fès road network
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Axis snapshot (`.json` or `.csv`), overrides the config file
    #[arg(long)]
    axes: Option<PathBuf>,
    /// Listen address, overrides the config file
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(axes) = args.axes {
        config.axes = Some(axes);
    }
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let routing = config.routing.clone();
    let axes_path = config.axes.clone();
    let snapshot = tokio::task::spawn_blocking(move || match axes_path {
        Some(path) => {
            let records = load_axes(&path)?;
            info!(path = %path.display(), records = records.len(), "Loaded axes");
            Snapshot::build(&records, &routing)
        }
        None => {
            warn!("No axes file configured, starting with an empty network");
            Ok(Snapshot::default())
        }
    })
    .await??;
    info!(
        nodes = snapshot.network.node_count(),
        edges = snapshot.network.edge_count(),
        "Road network ready"
    );

    let state = AppState::new(config.routing.clone(), snapshot);
    let app = api::app(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
