use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    catalog::{Catalog, CatalogError},
    entities::{StoreError, WatchProgress},
    tracker::{
        self, EpisodeRef, EpisodeTag, ProgressSummary, RenewalNotice, SeasonDetails,
        SeriesMetadata, ShowStatus, TrackerConfig, WatchState, dates,
    },
};

/// Lifecycle badge of a series
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub series_id: u64,
    pub name: String,
    pub status: Option<ShowStatus>,
    pub renewal: Option<RenewalNotice>,
}

/// The episode a user should watch next
#[derive(Debug, Clone, Serialize)]
pub struct NextEpisode {
    #[serde(flatten)]
    pub position: EpisodeRef,
    pub name: Option<String>,
    pub air_date: Option<NaiveDate>,
    pub tag: Option<EpisodeTag>,
}

/// Everything the show card displays for one user
#[derive(Debug, Clone, Serialize)]
pub struct ShowOverview {
    pub series_id: u64,
    pub name: String,
    pub poster_path: Option<String>,
    pub status: Option<ShowStatus>,
    pub renewal: Option<RenewalNotice>,
    pub progress: ProgressSummary,
    pub next_episode: Option<NextEpisode>,
}

/// One row of a season listing
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeView {
    pub season_number: u32,
    pub episode_number: u32,
    pub name: String,
    pub air_date: Option<NaiveDate>,
    pub aired: bool,
    pub watched: bool,
    pub tag: Option<EpisodeTag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonListing {
    pub series_id: u64,
    pub season_number: u32,
    pub episodes: Vec<EpisodeView>,
}

/// Joins catalog snapshots with stored watch state and runs the derivations
pub struct TrackerService {
    catalog: Arc<Catalog>,
    db: SqlitePool,
    config: TrackerConfig,
}

impl TrackerService {
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>, db: SqlitePool, config: TrackerConfig) -> Self {
        Self {
            catalog,
            db,
            config,
        }
    }

    /// Status badge and renewal notice for a series
    pub async fn status(&self, series_id: u64) -> Result<StatusView, TrackerError> {
        let series = self.catalog.series(series_id).await?;
        Ok(self.status_of(&series, dates::today_utc()))
    }

    fn status_of(&self, series: &SeriesMetadata, today: NaiveDate) -> StatusView {
        StatusView {
            series_id: series.id,
            name: series.name.clone(),
            status: tracker::resolve_status_with(series, today, &self.config),
            renewal: tracker::infer_renewal(series),
        }
    }

    /// Status, progress and next episode of a series for one user.
    ///
    /// `target_season` pins the seasonal breakdown; by default it follows
    /// the next episode to watch.
    pub async fn overview(
        &self,
        user_id: &str,
        series_id: u64,
        target_season: Option<u32>,
    ) -> Result<ShowOverview, TrackerError> {
        info!("Building overview of series {} for {}", series_id, user_id);

        let series = self.catalog.series(series_id).await?;
        let series_state = WatchProgress::load_series_state(&self.db, user_id, series_id).await?;
        let details = self.season_details(&series).await;

        let mut watch = WatchState::default();
        watch.0.insert(series_id, series_state);

        let today = dates::today_utc();
        let status = self.status_of(&series, today);
        let progress =
            tracker::aggregate_with_details(&series, &details, &watch, target_season, today);
        let next_episode = progress
            .next_episode
            .map(|position| describe_next(&series, &details, position));

        debug!(
            "Series {}: {} of {} aired episodes watched",
            series_id, progress.watched_total, progress.total_aired
        );

        Ok(ShowOverview {
            series_id,
            name: status.name,
            poster_path: series.poster_path.clone(),
            status: status.status,
            renewal: status.renewal,
            progress,
            next_episode,
        })
    }

    /// Episodes of one season with badges, and watched flags when a user is given
    pub async fn season(
        &self,
        series_id: u64,
        season_number: u32,
        user_id: Option<&str>,
    ) -> Result<SeasonListing, TrackerError> {
        let series = self.catalog.series(series_id).await?;
        if series.season(season_number).is_none() {
            return Err(TrackerError::SeasonNotFound {
                series_id,
                season_number,
            });
        }

        let details = self.catalog.season(series_id, season_number).await?;
        let watch = match user_id {
            Some(user) => WatchProgress::load_series_state(&self.db, user, series_id).await?,
            None => Default::default(),
        };

        let today = dates::today_utc();
        let mut episodes: Vec<EpisodeView> = details
            .episodes
            .iter()
            .map(|episode| EpisodeView {
                season_number,
                episode_number: episode.episode_number,
                name: episode.name.clone(),
                air_date: episode.aired_on(),
                aired: dates::has_aired(episode.aired_on(), today),
                watched: watch.is_watched(season_number, episode.episode_number),
                tag: tracker::classify_in_series(episode, &series),
            })
            .collect();
        episodes.sort_by_key(|e| e.episode_number);

        Ok(SeasonListing {
            series_id,
            season_number,
            episodes,
        })
    }

    /// Listings of every regular season, fetched concurrently.
    ///
    /// A season that fails to load is left out; progress then falls back to
    /// the series summary for it.
    async fn season_details(&self, series: &SeriesMetadata) -> Vec<SeasonDetails> {
        let fetches = series
            .regular_seasons()
            .into_iter()
            .map(|season| self.catalog.season(series.id, season.season_number));

        join_all(fetches)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(details) => Some(details.as_ref().clone()),
                Err(e) => {
                    warn!("Skipping season details of series {}: {}", series.id, e);
                    None
                }
            })
            .collect()
    }
}

fn describe_next(
    series: &SeriesMetadata,
    details: &[SeasonDetails],
    position: EpisodeRef,
) -> NextEpisode {
    let episode = details
        .iter()
        .find(|d| d.season_number == position.season_number)
        .and_then(|d| {
            d.episodes
                .iter()
                .find(|e| e.episode_number == position.episode_number)
        });

    NextEpisode {
        position,
        name: episode.map(|e| e.name.clone()),
        air_date: episode.and_then(|e| e.aired_on()),
        tag: episode.and_then(|e| tracker::classify_in_series(e, series)),
    }
}

/// Tracker service errors
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Series {series_id} has no season {season_number}")]
    SeasonNotFound { series_id: u64, season_number: u32 },
}
