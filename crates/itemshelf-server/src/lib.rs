//! itemshelf-server: HTTP API and image storage for the item catalog.
//!
//! Ties the item stores from `itemshelf-db` to an Axum router:
//!
//! - `GET /` greeting
//! - `POST /items`, `GET /items`, `GET /items/{id}`
//! - `GET /images/{filename}` with a default-image fallback
//! - Graceful shutdown on Ctrl-C or SIGTERM

pub mod context;
pub mod error;
pub mod images;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use itemshelf_core::config::Config;
use itemshelf_core::Error;
use tokio::signal;

use crate::context::AppContext;

/// Start the itemshelf server.
///
/// Opens the configured item store and image directory, then serves HTTP
/// until a shutdown signal is received.
pub async fn start(config: Config) -> itemshelf_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid listen address: {e}")))?;

    let ctx = AppContext::from_config(config)?;
    tracing::info!(
        backend = ctx.items.name(),
        images = %ctx.images.dir().display(),
        front_url = %ctx.config.server.front_url,
        "Storage ready"
    );

    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
