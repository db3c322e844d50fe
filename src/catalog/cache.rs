use crate::{
    catalog::types::CatalogItem,
    tracker::{SeasonDetails, SeriesMetadata},
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Cache key for search results
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct SearchKey {
    query: String,
    year: Option<i32>,
    media_type: Option<&'static str>,
}

/// Catalog snapshot cache.
///
/// Series and season snapshots are cached whole, so a reader always sees a
/// complete response from one fetch.
#[derive(Clone)]
pub struct CatalogCache {
    search_cache: Cache<SearchKey, Arc<Vec<CatalogItem>>>,
    series_cache: Cache<u64, Arc<SeriesMetadata>>,
    season_cache: Cache<(u64, u32), Arc<SeasonDetails>>,
}

impl CatalogCache {
    /// Create a new cache with default settings
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        let search_cache = Cache::builder()
            .max_capacity(config.search_max_entries)
            .time_to_live(config.search_ttl)
            .build();

        let series_cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        let season_cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();

        Self {
            search_cache,
            series_cache,
            season_cache,
        }
    }

    /// Get cached search results
    pub async fn get_search(
        &self,
        query: &str,
        year: Option<i32>,
        media_type: Option<&'static str>,
    ) -> Option<Vec<CatalogItem>> {
        let key = SearchKey {
            query: query.to_lowercase(),
            year,
            media_type,
        };

        self.search_cache.get(&key).await.map(|arc| (*arc).clone())
    }

    /// Cache search results
    pub async fn set_search(
        &self,
        query: &str,
        year: Option<i32>,
        media_type: Option<&'static str>,
        results: Vec<CatalogItem>,
    ) {
        let key = SearchKey {
            query: query.to_lowercase(),
            year,
            media_type,
        };

        self.search_cache.insert(key, Arc::new(results)).await;
    }

    pub async fn get_series(&self, id: u64) -> Option<Arc<SeriesMetadata>> {
        self.series_cache.get(&id).await
    }

    pub async fn set_series(&self, series: Arc<SeriesMetadata>) {
        self.series_cache.insert(series.id, series).await;
    }

    pub async fn get_season(&self, series_id: u64, season_number: u32) -> Option<Arc<SeasonDetails>> {
        self.season_cache.get(&(series_id, season_number)).await
    }

    pub async fn set_season(&self, series_id: u64, season: Arc<SeasonDetails>) {
        self.season_cache
            .insert((series_id, season.season_number), season)
            .await;
    }

    /// Drop one series and its seasons, e.g. after a manual refresh
    pub async fn invalidate_series(&self, id: u64) {
        self.series_cache.invalidate(&id).await;
        let stale: Vec<(u64, u32)> = self
            .season_cache
            .iter()
            .filter(|(key, _)| key.0 == id)
            .map(|(key, _)| *key)
            .collect();
        for key in stale {
            self.season_cache.invalidate(&key).await;
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            search_entries: self.search_cache.entry_count(),
            series_entries: self.series_cache.entry_count(),
            season_entries: self.season_cache.entry_count(),
        }
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of search result entries
    pub search_max_entries: u64,
    /// TTL for search results
    pub search_ttl: Duration,
    /// Maximum number of series and of season entries
    pub max_entries: u64,
    /// TTL for series and season snapshots
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search_max_entries: 1000,
            search_ttl: Duration::from_secs(3600), // 1 hour
            max_entries: 500,
            ttl: Duration::from_secs(6 * 3600),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub search_entries: u64,
    pub series_entries: u64,
    pub season_entries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::SeriesStatus;

    #[tokio::test]
    async fn test_series_roundtrip_and_invalidate() {
        let cache = CatalogCache::new();
        let series = Arc::new(SeriesMetadata::new(10, Some(SeriesStatus::Ended)));
        cache.set_series(series.clone()).await;
        cache
            .set_season(
                10,
                Arc::new(SeasonDetails {
                    season_number: 1,
                    air_date: None,
                    episodes: Vec::new(),
                }),
            )
            .await;

        assert_eq!(cache.get_series(10).await, Some(series));
        assert!(cache.get_season(10, 1).await.is_some());

        cache.invalidate_series(10).await;
        assert!(cache.get_series(10).await.is_none());
        assert!(cache.get_season(10, 1).await.is_none());
    }

    #[tokio::test]
    async fn test_search_key_is_case_insensitive() {
        let cache = CatalogCache::new();
        cache.set_search("Severance", None, Some("tv"), Vec::new()).await;

        assert!(cache.get_search("severance", None, Some("tv")).await.is_some());
        assert!(cache.get_search("severance", None, None).await.is_none());
    }
}
