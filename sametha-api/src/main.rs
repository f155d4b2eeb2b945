//! sametha-api - proverb annotation service
//!
//! Resolves configuration (CLI > environment > TOML > defaults), opens the
//! configured record store and serves the annotation API.

use anyhow::{Context, Result};
use clap::Parser;
use sametha_common::config::{ConfigOverrides, RootFolderInitializer, ServiceConfig};
use sametha_common::{Annotations, StorageBackend};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sametha_api::{build_router, AppState};

const MODULE_NAME: &str = "sametha-api";

#[derive(Parser, Debug)]
#[command(name = "sametha-api")]
#[command(about = "Telugu proverb annotation service")]
#[command(version)]
struct Args {
    /// Root folder holding the data directory or database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "SAMETHA_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SAMETHA_BIND_ADDRESS")]
    bind: Option<String>,

    /// Record store backend (csv or sqlite)
    #[arg(short, long)]
    backend: Option<StorageBackend>,

    /// Explicit TOML config file
    #[arg(short, long, env = "SAMETHA_CONFIG")]
    config: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "SAMETHA_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            root_folder: args.root_folder,
            config_file: args.config,
            storage_backend: args.backend,
            bind_address: args.bind,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::resolve(MODULE_NAME, args.into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Sametha annotation service (sametha-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to create root folder")?;
    info!("Root folder: {}", initializer.root().display());
    info!(
        backend = %config.storage_backend,
        script = %config.source_script,
        "Opening record store"
    );

    let annotations = Annotations::open(
        config.storage_backend,
        initializer.root(),
        config.source_script,
    )
    .await
    .context("Failed to open record store")?;

    let app = build_router(AppState::new(annotations));

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("sametha-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
