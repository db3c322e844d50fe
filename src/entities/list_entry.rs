use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use super::{Result, StoreError};
use crate::catalog::MediaType;

/// Personal list a title can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ListKind {
    Watching,
    PlanToWatch,
    Completed,
    Favorites,
    OnHold,
    Dropped,
}

impl ListKind {
    pub const ALL: [Self; 6] = [
        Self::Watching,
        Self::PlanToWatch,
        Self::Completed,
        Self::Favorites,
        Self::OnHold,
        Self::Dropped,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watching => "watching",
            Self::PlanToWatch => "plan_to_watch",
            Self::Completed => "completed",
            Self::Favorites => "favorites",
            Self::OnHold => "on_hold",
            Self::Dropped => "dropped",
        }
    }
}

impl FromStr for ListKind {
    type Err = StoreError;

    /// Accepts `plan_to_watch` as well as `plan-to-watch`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| StoreError::UnknownList(s.to_string()))
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie or series filed under one of a user's lists
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListEntry {
    pub user_id: String,
    pub list: ListKind,
    pub media_type: MediaType,
    pub media_id: i64,
    pub added_at: DateTime<Utc>,
}

impl ListEntry {
    /// File a title under a list; re-adding keeps the original timestamp
    pub async fn add(
        db: &SqlitePool,
        user_id: &str,
        list: ListKind,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<Self> {
        sqlx::query(
            r"
            INSERT INTO list_entries (user_id, list, media_type, media_id, added_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, list, media_type, media_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(list)
        .bind(media_type)
        .bind(media_id as i64)
        .bind(Utc::now())
        .execute(db)
        .await?;

        let entry = sqlx::query_as::<_, Self>(
            r"
            SELECT * FROM list_entries
            WHERE user_id = ? AND list = ? AND media_type = ? AND media_id = ?
            ",
        )
        .bind(user_id)
        .bind(list)
        .bind(media_type)
        .bind(media_id as i64)
        .fetch_one(db)
        .await?;

        Ok(entry)
    }

    /// `false` if the title wasn't on the list
    pub async fn remove(
        db: &SqlitePool,
        user_id: &str,
        list: ListKind,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM list_entries
            WHERE user_id = ? AND list = ? AND media_type = ? AND media_id = ?
            ",
        )
        .bind(user_id)
        .bind(list)
        .bind(media_type)
        .bind(media_id as i64)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Entries of one list, most recently added first
    pub async fn list(db: &SqlitePool, user_id: &str, list: ListKind) -> Result<Vec<Self>> {
        let entries = sqlx::query_as::<_, Self>(
            r"
            SELECT * FROM list_entries
            WHERE user_id = ? AND list = ?
            ORDER BY added_at DESC, media_id
            ",
        )
        .bind(user_id)
        .bind(list)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }

    /// Lists a title is filed under
    pub async fn lists_containing(
        db: &SqlitePool,
        user_id: &str,
        media_type: MediaType,
        media_id: u64,
    ) -> Result<Vec<ListKind>> {
        let lists = sqlx::query_scalar::<_, ListKind>(
            r"
            SELECT list FROM list_entries
            WHERE user_id = ? AND media_type = ? AND media_id = ?
            ORDER BY list
            ",
        )
        .bind(user_id)
        .bind(media_type)
        .bind(media_id as i64)
        .fetch_all(db)
        .await?;

        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::memory_pool;

    #[test]
    fn test_list_kind_parse() {
        assert_eq!("plan_to_watch".parse::<ListKind>().unwrap(), ListKind::PlanToWatch);
        assert_eq!("On-Hold".parse::<ListKind>().unwrap(), ListKind::OnHold);
        assert!(matches!(
            "seen".parse::<ListKind>(),
            Err(StoreError::UnknownList(_))
        ));
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let db = memory_pool().await;
        let first = ListEntry::add(&db, "alice", ListKind::Watching, MediaType::Tv, 1399)
            .await
            .unwrap();
        let again = ListEntry::add(&db, "alice", ListKind::Watching, MediaType::Tv, 1399)
            .await
            .unwrap();

        assert_eq!(first.added_at, again.added_at);
        let entries = ListEntry::list(&db, "alice", ListKind::Watching).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].media_type, MediaType::Tv);
    }

    #[tokio::test]
    async fn test_same_id_different_media_types() {
        let db = memory_pool().await;
        ListEntry::add(&db, "alice", ListKind::Favorites, MediaType::Tv, 42)
            .await
            .unwrap();
        ListEntry::add(&db, "alice", ListKind::Favorites, MediaType::Movie, 42)
            .await
            .unwrap();
        ListEntry::add(&db, "alice", ListKind::Completed, MediaType::Movie, 42)
            .await
            .unwrap();

        let favorites = ListEntry::list(&db, "alice", ListKind::Favorites).await.unwrap();
        assert_eq!(favorites.len(), 2);

        let lists = ListEntry::lists_containing(&db, "alice", MediaType::Movie, 42)
            .await
            .unwrap();
        assert_eq!(lists.len(), 2);
        assert!(lists.contains(&ListKind::Completed));
    }

    #[tokio::test]
    async fn test_remove() {
        let db = memory_pool().await;
        ListEntry::add(&db, "alice", ListKind::Dropped, MediaType::Tv, 7)
            .await
            .unwrap();

        assert!(
            ListEntry::remove(&db, "alice", ListKind::Dropped, MediaType::Tv, 7)
                .await
                .unwrap()
        );
        assert!(
            !ListEntry::remove(&db, "alice", ListKind::Dropped, MediaType::Tv, 7)
                .await
                .unwrap()
        );
        assert!(ListEntry::list(&db, "alice", ListKind::Dropped).await.unwrap().is_empty());
    }
}
