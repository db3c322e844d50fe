//! Wire shapes of the TMDB v3 endpoints the provider reads.
//! Only fields the provider maps are declared; serde ignores the rest.

use serde::Deserialize;

/// First page of `/search/movie` or `/search/tv`
#[derive(Debug, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct MovieResult {
    pub id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TvResult {
    pub id: u64,
    pub name: String,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
}

/// `/movie/{id}`
#[derive(Debug, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub status: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// `/tv/{id}`; `status` is e.g. "Returning Series" or "Ended"
#[derive(Debug, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    pub name: String,
    pub status: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub next_episode_to_air: Option<EpisodeDetails>,
    pub last_episode_to_air: Option<EpisodeDetails>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// `/tv/{id}/season/{n}`
#[derive(Debug, Deserialize)]
pub struct SeasonDetails {
    pub season_number: u32,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeDetails>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeDetails {
    pub season_number: u32,
    pub episode_number: u32,
    pub name: Option<String>,
    pub air_date: Option<String>,
    /// "standard", "mid_season" or "finale"
    pub episode_type: Option<String>,
    pub still_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// Season summary embedded in `TvDetails`
#[derive(Debug, Deserialize)]
pub struct Season {
    pub season_number: u32,
    pub name: Option<String>,
    pub air_date: Option<String>,
    pub episode_count: Option<u32>,
    pub poster_path: Option<String>,
}
