pub mod http;
pub mod tmdb;
pub mod traits;

pub use http::HttpClient;
pub use tmdb::{TMDB_BASE_URL, TMDB_IMAGE_BASE, TmdbProvider};
pub use traits::{CatalogProvider, SearchOptions};
