//! User data persisted in SQLite.

mod list_entry;
mod watch_progress;

pub use list_entry::{ListEntry, ListKind};
pub use watch_progress::{EpisodeKey, WatchProgress};

use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use tracing::info;

use crate::config::DatabaseConfig;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid episode status: {0} (expected 0, 1 or 2)")]
    InvalidStatus(i32),

    #[error("Unknown list: {0}")]
    UnknownList(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Open the pool and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!("Database ready at {}", config.url);

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .unwrap()
}
