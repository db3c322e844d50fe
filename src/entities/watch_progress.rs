use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::{Result, StoreError};
use crate::tracker::{EpisodeProgress, SeriesWatchState, WatchState};

/// Highest valid episode status; 2 means watched
const MAX_STATUS: i32 = 2;

/// Identifies one episode of one series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeKey {
    pub series_id: u64,
    pub season_number: u32,
    pub episode_number: u32,
}

impl EpisodeKey {
    pub const fn new(series_id: u64, season_number: u32, episode_number: u32) -> Self {
        Self {
            series_id,
            season_number,
            episode_number,
        }
    }
}

/// Stored progress row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WatchProgress {
    pub user_id: String,
    pub series_id: i64,
    pub season_number: i64,
    pub episode_number: i64,
    pub status: i64,
    pub updated_at: DateTime<Utc>,
}

impl WatchProgress {
    pub fn progress(&self) -> EpisodeProgress {
        EpisodeProgress {
            status: self.status as i32,
        }
    }

    /// Insert or update the status of one episode
    pub async fn set_status(
        db: &SqlitePool,
        user_id: &str,
        key: EpisodeKey,
        status: i32,
    ) -> Result<Self> {
        if !(0..=MAX_STATUS).contains(&status) {
            return Err(StoreError::InvalidStatus(status));
        }

        sqlx::query(
            r"
            INSERT INTO watch_progress
                (user_id, series_id, season_number, episode_number, status, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, series_id, season_number, episode_number)
            DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(key.series_id as i64)
        .bind(key.season_number)
        .bind(key.episode_number)
        .bind(status)
        .bind(Utc::now())
        .execute(db)
        .await?;

        Self::find(db, user_id, key)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    /// Remove the stored status of one episode; `false` if none was stored
    pub async fn clear(db: &SqlitePool, user_id: &str, key: EpisodeKey) -> Result<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM watch_progress
            WHERE user_id = ? AND series_id = ? AND season_number = ? AND episode_number = ?
            ",
        )
        .bind(user_id)
        .bind(key.series_id as i64)
        .bind(key.season_number)
        .bind(key.episode_number)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find(db: &SqlitePool, user_id: &str, key: EpisodeKey) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>(
            r"
            SELECT * FROM watch_progress
            WHERE user_id = ? AND series_id = ? AND season_number = ? AND episode_number = ?
            ",
        )
        .bind(user_id)
        .bind(key.series_id as i64)
        .bind(key.season_number)
        .bind(key.episode_number)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    pub async fn list_for_series(
        db: &SqlitePool,
        user_id: &str,
        series_id: u64,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            r"
            SELECT * FROM watch_progress
            WHERE user_id = ? AND series_id = ?
            ORDER BY season_number, episode_number
            ",
        )
        .bind(user_id)
        .bind(series_id as i64)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    pub async fn list_for_user(db: &SqlitePool, user_id: &str) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            r"
            SELECT * FROM watch_progress
            WHERE user_id = ?
            ORDER BY series_id, season_number, episode_number
            ",
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Watch state of one series, as the progress aggregator reads it
    pub async fn load_series_state(
        db: &SqlitePool,
        user_id: &str,
        series_id: u64,
    ) -> Result<SeriesWatchState> {
        let mut state = SeriesWatchState::new();
        for row in Self::list_for_series(db, user_id, series_id).await? {
            state.set(
                row.season_number as u32,
                row.episode_number as u32,
                row.progress(),
            );
        }
        Ok(state)
    }

    /// Watch state of every series the user has touched
    pub async fn load_watch_state(db: &SqlitePool, user_id: &str) -> Result<WatchState> {
        let mut state = WatchState::default();
        for row in Self::list_for_user(db, user_id).await? {
            state.set(
                row.series_id as u64,
                row.season_number as u32,
                row.episode_number as u32,
                row.progress(),
            );
        }
        Ok(state)
    }
}
