//! Filedrop server binary.
//!
//! Accepts single-file multipart uploads into a flat upload directory and
//! lists what has been stored. The main entry point parses configuration,
//! builds the Axum router and serves it until shutdown.

mod app;
mod config;
mod error;
mod files;
mod http;
mod logging;
mod storage;
mod upload;

use clap::Parser;
use shadow_rs::shadow;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::app::build_router;
use crate::config::Args;
use crate::http::AllowedOrigins;
use crate::storage::Storage;

shadow!(build);

/// Starts the Filedrop server and blocks until shutdown.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    logging::init_logging();

    let args = Args::parse();
    let storage = Arc::new(Storage::new(PathBuf::from(&args.upload_dir)));
    storage.ensure_root().await?;
    let origins = AllowedOrigins::parse(&args.cors_origins);
    let app = build_router(storage.clone(), origins);

    let host = args
        .host
        .parse::<IpAddr>()
        .map_err(|err| std::io::Error::new(ErrorKind::InvalidInput, err.to_string()))?;
    let addr = SocketAddr::new(host, args.port);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) if matches!(err.kind(), ErrorKind::PermissionDenied) => {
            error!(%addr, error = %err, "port requires elevated privileges");
            std::process::exit(1);
        }
        Err(err) if matches!(err.kind(), ErrorKind::AddrInUse) => {
            error!(%addr, error = %err, "port is already in use");
            std::process::exit(1);
        }
        Err(err) => return Err(err),
    };

    info!(
        addr = %listener.local_addr()?,
        upload_dir = ?storage.root_path(),
        "server is running"
    );
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received termination signal shutting down");
}
