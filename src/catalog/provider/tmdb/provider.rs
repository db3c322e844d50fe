use super::api_types::{
    EpisodeDetails, MovieDetails as TmdbMovie, MovieResult, SearchResponse,
    SeasonDetails as TmdbSeason, TvDetails, TvResult,
};
use crate::{
    catalog::{
        Result,
        provider::{CatalogProvider, HttpClient, SearchOptions},
        types::{CatalogItem, MediaType, MovieDetails, year_of},
    },
    tracker::{Episode, EpisodeType, SeasonDetails, SeasonSummary, SeriesMetadata, SeriesStatus},
};
use async_trait::async_trait;
use tracing::{debug, warn};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub struct TmdbProvider {
    client: HttpClient,
    api_key: String,
    image_base: String,
}

impl TmdbProvider {
    /// Point the provider at another API host, e.g. a proxy or a test server
    pub fn with_base_urls(
        api_key: impl Into<String>,
        base_url: &str,
        image_base: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url)?,
            api_key: api_key.into(),
            image_base: image_base.trim_end_matches('/').to_string(),
        })
    }

    fn image_url(&self, path: Option<&str>, size: &str) -> Option<String> {
        path.map(|p| format!("{}/{size}{p}", self.image_base))
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<T> {
        let mut params: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        params.extend_from_slice(extra_params);

        debug!("TMDB request: {}", endpoint);
        self.client.get_with_params(endpoint, &params).await
    }

    async fn search_movies(&self, query: &str, options: &SearchOptions) -> Result<Vec<CatalogItem>> {
        let mut params = vec![("query", query)];
        let year_str;
        if let Some(year) = options.year {
            year_str = year.to_string();
            params.push(("year", &year_str));
        }

        let response: SearchResponse<MovieResult> =
            self.request("/search/movie", &params).await?;

        Ok(response
            .results
            .into_iter()
            .map(|m| self.movie_result_to_item(m))
            .collect())
    }

    async fn search_tv(&self, query: &str, options: &SearchOptions) -> Result<Vec<CatalogItem>> {
        let mut params = vec![("query", query)];
        let year_str;
        if let Some(year) = options.year {
            year_str = year.to_string();
            params.push(("first_air_date_year", &year_str));
        }

        let response: SearchResponse<TvResult> = self.request("/search/tv", &params).await?;

        Ok(response
            .results
            .into_iter()
            .map(|t| self.tv_result_to_item(t))
            .collect())
    }

    fn movie_result_to_item(&self, movie: MovieResult) -> CatalogItem {
        CatalogItem::new(movie.id, movie.title, MediaType::Movie, self.id())
            .with_year(year_of(movie.release_date.as_deref()))
            .with_original_title(movie.original_title)
            .with_poster(self.image_url(movie.poster_path.as_deref(), "w500"))
            .with_overview(movie.overview)
            .with_rating(movie.vote_average)
            .with_popularity(movie.popularity)
    }

    fn tv_result_to_item(&self, tv: TvResult) -> CatalogItem {
        CatalogItem::new(tv.id, tv.name, MediaType::Tv, self.id())
            .with_year(year_of(tv.first_air_date.as_deref()))
            .with_original_title(tv.original_name)
            .with_poster(self.image_url(tv.poster_path.as_deref(), "w500"))
            .with_overview(tv.overview)
            .with_rating(tv.vote_average)
            .with_popularity(tv.popularity)
    }
}

fn series_status(status: &str) -> SeriesStatus {
    match status {
        "Returning Series" => SeriesStatus::ReturningSeries,
        "Ended" => SeriesStatus::Ended,
        "Canceled" | "Cancelled" => SeriesStatus::Canceled,
        "In Production" => SeriesStatus::InProduction,
        "Pilot" => SeriesStatus::Pilot,
        _ => SeriesStatus::Other,
    }
}

// TMDB labels season finales "finale" and mid-season breaks "mid_season"
fn episode_type(kind: &str) -> EpisodeType {
    match kind {
        "series_finale" => EpisodeType::SeriesFinale,
        "season_finale" | "finale" => EpisodeType::SeasonFinale,
        "midseason_finale" | "mid_season" => EpisodeType::MidseasonFinale,
        "standard" => EpisodeType::Standard,
        _ => EpisodeType::Other,
    }
}

fn to_episode(ep: EpisodeDetails) -> Episode {
    Episode {
        season_number: ep.season_number,
        episode_number: ep.episode_number,
        air_date: ep.air_date,
        episode_type: ep.episode_type.as_deref().map(episode_type),
        name: ep.name.unwrap_or_default(),
        still_path: ep.still_path,
    }
}

#[async_trait]
impl CatalogProvider for TmdbProvider {
    fn id(&self) -> &'static str {
        "tmdb"
    }

    fn name(&self) -> &'static str {
        "The Movie Database"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<CatalogItem>> {
        match options.media_type {
            Some(MediaType::Movie) => self.search_movies(query, options).await,
            Some(MediaType::Tv) => self.search_tv(query, options).await,
            None => {
                let (movies, tv) = tokio::join!(
                    self.search_movies(query, options),
                    self.search_tv(query, options)
                );
                // One failing half still yields the other's hits
                match (movies, tv) {
                    (Ok(mut movies), Ok(tv)) => {
                        movies.extend(tv);
                        Ok(movies)
                    }
                    (Ok(hits), Err(e)) | (Err(e), Ok(hits)) => {
                        warn!("Partial search for '{}': {}", query, e);
                        Ok(hits)
                    }
                    (Err(e), Err(_)) => Err(e),
                }
            }
        }
    }

    async fn get_series(&self, id: u64) -> Result<SeriesMetadata> {
        let tv: TvDetails = self.request(&format!("/tv/{id}"), &[]).await?;

        Ok(SeriesMetadata {
            id: tv.id,
            name: tv.name,
            status: tv.status.as_deref().map(series_status),
            first_air_date: tv.first_air_date,
            next_episode_to_air: tv.next_episode_to_air.map(to_episode),
            last_episode_to_air: tv.last_episode_to_air.map(to_episode),
            seasons: tv
                .seasons
                .into_iter()
                .map(|s| SeasonSummary {
                    season_number: s.season_number,
                    episode_count: s.episode_count.unwrap_or(0),
                    air_date: s.air_date,
                    poster_path: s.poster_path,
                    name: s.name,
                })
                .collect(),
            poster_path: tv.poster_path,
        })
    }

    async fn get_season(&self, series_id: u64, season_number: u32) -> Result<SeasonDetails> {
        let endpoint = format!("/tv/{series_id}/season/{season_number}");
        let season: TmdbSeason = self.request(&endpoint, &[]).await?;

        Ok(SeasonDetails {
            season_number: season.season_number,
            air_date: season.air_date,
            episodes: season.episodes.into_iter().map(to_episode).collect(),
        })
    }

    async fn get_movie(&self, id: u64) -> Result<MovieDetails> {
        let movie: TmdbMovie = self.request(&format!("/movie/{id}"), &[]).await?;

        Ok(MovieDetails {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            overview: movie.overview,
            release_date: movie.release_date,
            runtime: movie.runtime,
            status: movie.status,
            genres: movie.genres.into_iter().map(|g| g.name).collect(),
            poster_url: self.image_url(movie.poster_path.as_deref(), "w500"),
            backdrop_url: self.image_url(movie.backdrop_path.as_deref(), "original"),
            rating: movie.vote_average,
        })
    }
}
