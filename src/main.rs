use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};

use cinemontauge::{Ctx, config::AppConfig, create_router, entities, logging};

const CONFIG_ENV: &str = "CINEMONTAUGE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    let _guard = logging::init(&config.logging).map_err(anyhow::Error::msg)?;
    info!("Starting CineMontauge v{}", env!("CARGO_PKG_VERSION"));

    if let Some(dir) = database_dir(&config.database.url) {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let db = entities::connect(&config.database)
        .await
        .context("Failed to open database")?;

    let address = config.bind_address();
    let ctx = Ctx::new(db, config).context("Failed to initialize services")?;
    if ctx.catalog.is_none() {
        warn!("No TMDB API key configured; catalog and show routes are unavailable");
    }
    if ctx.token_exchange.is_none() {
        warn!("OAuth credentials not configured; token exchange is unavailable");
    }

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, create_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down cleanly");
    Ok(())
}

/// Parent directory of a file-backed SQLite URL
fn database_dir(url: &str) -> Option<PathBuf> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
