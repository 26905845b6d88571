//! # Farmácia API Server
//!
//! ```text
//! load ApiConfig (env) ──► open SQLite + migrate ──► bind ──► serve
//!                                                               │
//!                                            Ctrl+C / SIGTERM ──┘──► close pool
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use farmacia_api::config::ApiConfig;
use farmacia_api::{build_router, AppState};
use farmacia_core::CredentialHasher;
use farmacia_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,farmacia_api=debug")),
        )
        .with_target(true)
        .init();

    info!("Starting Farmácia API server...");

    let config = ApiConfig::load().context("invalid configuration")?;
    info!(
        addr = %config.listen_address(),
        database = %config.database_path,
        timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("failed to open database")?;
    let (total, applied) = db.migration_status().await?;
    info!(total, applied, "Database ready");

    let listener = TcpListener::bind(config.listen_address())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_address()))?;
    info!(addr = %config.listen_address(), "HTTP server listening");

    let state = AppState::new(db.clone(), config, CredentialHasher::default());

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(?e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(?e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
