mod api_types;
mod provider;

pub use provider::{TMDB_BASE_URL, TMDB_IMAGE_BASE, TmdbProvider};
