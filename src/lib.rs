// src/lib.rs

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod serve;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::ReloaderConfig;
use crate::coordinator::{spawn_coordinator, CoordinatorHandle};
use crate::errors::{ReloaderError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::serve::{create_router, AppState};
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// Resolves the configuration from the command line and runs the server
/// until Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let config = config::from_cli_args(&args, fs.as_ref())?;
    serve(config, fs).await
}

/// Run the reload server for an already-resolved configuration.
///
/// This wires together:
/// - the change coordinator
/// - the file watcher feeding it
/// - the HTTP listener and router
/// - Ctrl-C handling
///
/// Watcher and listener failures are fatal; watch errors after startup are
/// only logged.
pub async fn serve(config: ReloaderConfig, fs: Arc<dyn FileSystem>) -> Result<()> {
    let coordinator = spawn_coordinator(config.debounce, config.filter.clone());

    // Kept alive for the whole run; dropping it stops watching.
    let _watcher = spawn_watcher(&config.target, coordinator.clone())?;

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| ReloaderError::Listen {
            address: config.listen,
            source,
        })?;
    info!(address = %config.listen, target = ?config.target, "listening");

    let state = Arc::new(AppState {
        fs,
        target: config.target.clone(),
        coordinator: coordinator.clone(),
        poll_timeout: config.poll_timeout,
    });
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(coordinator.clone()))
        .await?;

    coordinator.shutdown();
    info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C, after telling the coordinator to release parked
/// long-polls so graceful shutdown does not wait on them.
async fn shutdown_signal(coordinator: CoordinatorHandle) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, stopping server");
    coordinator.shutdown();
}
