use crate::{
    catalog::{
        Result,
        types::{CatalogItem, MediaType, MovieDetails},
    },
    tracker::{SeasonDetails, SeriesMetadata},
};
use async_trait::async_trait;

/// Search options for providers
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Year filter
    pub year: Option<i32>,
    /// Media type filter
    pub media_type: Option<MediaType>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_type(mut self, media_type: Option<MediaType>) -> Self {
        self.media_type = media_type;
        self
    }
}

/// Read-only source of series, season and movie snapshots
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Provider identifier (e.g., "tmdb")
    fn id(&self) -> &'static str;

    /// Human-readable provider name
    fn name(&self) -> &'static str;

    /// Search for movies and series; zero hits is an empty list
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<CatalogItem>>;

    /// Series snapshot, including next/last episode pointers and season list
    async fn get_series(&self, id: u64) -> Result<SeriesMetadata>;

    /// Full episode listing of one season
    async fn get_season(&self, series_id: u64, season_number: u32) -> Result<SeasonDetails>;

    /// Movie details
    async fn get_movie(&self, id: u64) -> Result<MovieDetails>;
}
