mod cache;
mod manager;
mod provider;
mod types;

pub use cache::{CacheConfig, CacheStats, CatalogCache};
pub use manager::Catalog;
pub use provider::{
    CatalogProvider, HttpClient, SearchOptions, TMDB_BASE_URL, TMDB_IMAGE_BASE, TmdbProvider,
};
pub use types::{CatalogItem, MediaType, MovieDetails};

use std::time::Duration;

/// Catalog result type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded. Retry after: {0:?}")]
    RateLimit(Duration),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Create a TMDB-backed catalog from configuration, if an API key is set
pub fn create_catalog(config: &crate::config::CatalogConfig) -> Result<Option<Catalog>> {
    let Some(key) = config.tmdb_api_key.as_deref().filter(|k| !k.is_empty()) else {
        return Ok(None);
    };

    let provider = TmdbProvider::with_base_urls(key, &config.base_url, &config.image_base_url)?;
    let cache = CacheConfig {
        max_entries: config.cache_max_entries,
        ttl: Duration::from_secs(config.cache_ttl_secs),
        ..Default::default()
    };

    Ok(Some(Catalog::with_cache(provider, cache)))
}
