use crate::{
    catalog::{
        Result,
        cache::{CacheConfig, CacheStats, CatalogCache},
        provider::{CatalogProvider, SearchOptions},
        types::{CatalogItem, MediaType, MovieDetails},
    },
    tracker::{SeasonDetails, SeriesMetadata},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Cached front for a catalog provider
pub struct Catalog {
    provider: Arc<dyn CatalogProvider>,
    cache: CatalogCache,
}

impl Catalog {
    /// Create a catalog with default cache settings
    pub fn new<P: CatalogProvider + 'static>(provider: P) -> Self {
        Self::with_cache(provider, CacheConfig::default())
    }

    /// Create with custom cache configuration
    pub fn with_cache<P: CatalogProvider + 'static>(provider: P, config: CacheConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            cache: CatalogCache::with_config(config),
        }
    }

    /// Search movies and series, at most `limit` hits.
    ///
    /// The cache holds the provider's full result so any limit can be
    /// served from it.
    pub async fn search(
        &self,
        query: &str,
        year: Option<i32>,
        media_type: Option<MediaType>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>> {
        let type_key = media_type.map(MediaType::as_str);
        let mut results = match self.cache.get_search(query, year, type_key).await {
            Some(cached) => {
                debug!("Search cache hit: {}", query);
                cached
            }
            None => {
                info!("Searching {} for: {}", self.provider.name(), query);
                let options = SearchOptions::new().with_year(year).with_type(media_type);
                let results = self.provider.search(query, &options).await?;
                self.cache
                    .set_search(query, year, type_key, results.clone())
                    .await;
                results
            }
        };

        results.truncate(limit);
        Ok(results)
    }

    /// Series snapshot; always a complete response from a single fetch
    pub async fn series(&self, id: u64) -> Result<Arc<SeriesMetadata>> {
        if let Some(series) = self.cache.get_series(id).await {
            debug!("Series cache hit: {}", id);
            return Ok(series);
        }

        let series = Arc::new(self.provider.get_series(id).await?);
        debug!(
            "Fetched series {} ({}) with {} seasons",
            series.id,
            series.name,
            series.seasons.len()
        );
        self.cache.set_series(series.clone()).await;
        Ok(series)
    }

    /// Full listing for one season
    pub async fn season(&self, series_id: u64, season_number: u32) -> Result<Arc<SeasonDetails>> {
        if let Some(season) = self.cache.get_season(series_id, season_number).await {
            return Ok(season);
        }

        let season = Arc::new(self.provider.get_season(series_id, season_number).await?);
        self.cache.set_season(series_id, season.clone()).await;
        Ok(season)
    }

    pub async fn movie(&self, id: u64) -> Result<MovieDetails> {
        self.provider.get_movie(id).await
    }

    /// Forget cached snapshots of one series
    pub async fn refresh(&self, series_id: u64) {
        info!("Invalidating cached catalog data for series {}", series_id);
        self.cache.invalidate_series(series_id).await;
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
