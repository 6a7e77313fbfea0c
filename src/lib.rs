pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod documents;
pub mod models;
pub mod pipeline;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::server::{start_server_on, ServerError};
use crate::config::Config;
use crate::core_state::CoreState;
use crate::db::DatabaseError;

/// Reasons the service refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Database unavailable: {0}")]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Run the check-in service until Ctrl+C or SIGTERM.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Config::from_env();

    // Refuse to serve requests against a database we cannot reach.
    let conn = db::open_database(&config.db_path)?;
    db::ping(&conn)?;
    drop(conn);
    tracing::info!(path = %config.db_path.display(), "Database ready");

    let core = attach_ocr(CoreState::new(&config.db_path), &config);
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let server = start_server_on(Arc::new(core), addr, &config.cors_origins).await?;

    shutdown_signal().await;
    server.stop().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}

/// Configure Tesseract when a tessdata directory is set. OCR stays off,
/// with a warning, when the engine cannot be prepared.
#[cfg(feature = "ocr")]
fn attach_ocr(core: CoreState, config: &Config) -> CoreState {
    let Some(dir) = config.tessdata_dir.as_deref() else {
        tracing::info!("ARCHECKIN_TESSDATA not set, document OCR disabled");
        return core;
    };
    match pipeline::ocr::BundledTesseract::new(dir, &config.ocr_lang) {
        Ok(engine) => core.with_ocr_engine(Arc::new(engine)),
        Err(e) => {
            tracing::warn!(error = %e, "Document OCR disabled");
            core
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn attach_ocr(core: CoreState, config: &Config) -> CoreState {
    if config.tessdata_dir.is_some() {
        tracing::warn!("Built without the `ocr` feature, ignoring ARCHECKIN_TESSDATA");
    }
    core
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
}
