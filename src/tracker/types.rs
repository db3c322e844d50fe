use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;

use super::dates;
use chrono::NaiveDate;

/// Season number reserved for specials
pub const SPECIALS_SEASON: u32 = 0;

/// Watch status value that marks an episode as watched
pub const WATCHED: i32 = 2;

/// Production status reported by the catalog for a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesStatus {
    #[serde(rename = "Returning Series")]
    ReturningSeries,
    Ended,
    Canceled,
    #[serde(rename = "In Production")]
    InProduction,
    Pilot,
    /// Any status string the catalog adds later (e.g. "Planned")
    #[serde(other)]
    Other,
}

/// Explicit episode classification from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeType {
    SeriesFinale,
    SeasonFinale,
    MidseasonFinale,
    Standard,
    #[serde(other)]
    Other,
}

/// A single episode, either a full listing entry or a next/last pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub season_number: u32,
    pub episode_number: u32,
    /// Air date (YYYY-MM-DD)
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_type: Option<EpisodeType>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub still_path: Option<String>,
}

impl Episode {
    pub fn new(season_number: u32, episode_number: u32) -> Self {
        Self {
            season_number,
            episode_number,
            air_date: None,
            episode_type: None,
            name: String::new(),
            still_path: None,
        }
    }

    pub fn with_air_date(mut self, air_date: impl Into<String>) -> Self {
        self.air_date = Some(air_date.into());
        self
    }

    pub fn with_type(mut self, episode_type: EpisodeType) -> Self {
        self.episode_type = Some(episode_type);
        self
    }

    /// Parsed air date; malformed or empty dates read as unknown
    pub fn aired_on(&self) -> Option<NaiveDate> {
        dates::parse(self.air_date.as_deref())
    }

    pub fn is_special(&self) -> bool {
        self.season_number == SPECIALS_SEASON
    }
}

/// Season entry as listed on the series itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    /// Total known episodes, aired or not
    #[serde(default)]
    pub episode_count: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SeasonSummary {
    pub fn new(season_number: u32, episode_count: u32) -> Self {
        Self {
            season_number,
            episode_count,
            air_date: None,
            poster_path: None,
            name: None,
        }
    }

    pub fn with_air_date(mut self, air_date: impl Into<String>) -> Self {
        self.air_date = Some(air_date.into());
        self
    }

    pub fn premieres_on(&self) -> Option<NaiveDate> {
        dates::parse(self.air_date.as_deref())
    }
}

/// Full per-season listing from the catalog's season endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetails {
    pub season_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Read-only snapshot of a series from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<SeriesStatus>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub next_episode_to_air: Option<Episode>,
    #[serde(default)]
    pub last_episode_to_air: Option<Episode>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl SeriesMetadata {
    pub fn new(id: u64, status: Option<SeriesStatus>) -> Self {
        Self {
            id,
            name: String::new(),
            status,
            first_air_date: None,
            next_episode_to_air: None,
            last_episode_to_air: None,
            seasons: Vec::new(),
            poster_path: None,
        }
    }

    pub fn season(&self, season_number: u32) -> Option<&SeasonSummary> {
        self.seasons
            .iter()
            .find(|s| s.season_number == season_number)
    }

    /// Regular seasons in ascending order, specials excluded
    pub fn regular_seasons(&self) -> Vec<&SeasonSummary> {
        let mut seasons: Vec<_> = self
            .seasons
            .iter()
            .filter(|s| s.season_number != SPECIALS_SEASON)
            .collect();
        seasons.sort_by_key(|s| s.season_number);
        seasons
    }

    /// Highest non-special season number
    pub fn max_season_number(&self) -> Option<u32> {
        self.seasons
            .iter()
            .map(|s| s.season_number)
            .filter(|n| *n != SPECIALS_SEASON)
            .max()
    }

    pub fn first_aired_on(&self) -> Option<NaiveDate> {
        dates::parse(self.first_air_date.as_deref())
    }
}

/// Stored progress for one episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeProgress {
    pub status: i32,
}

impl EpisodeProgress {
    pub const fn watched() -> Self {
        Self { status: WATCHED }
    }

    pub const fn is_watched(&self) -> bool {
        self.status == WATCHED
    }
}

/// Season number -> episode number -> progress, for one series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesWatchState(pub BTreeMap<u32, BTreeMap<u32, EpisodeProgress>>);

impl SeriesWatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, season_number: u32, episode_number: u32, progress: EpisodeProgress) {
        self.0
            .entry(season_number)
            .or_default()
            .insert(episode_number, progress);
    }

    pub fn is_watched(&self, season_number: u32, episode_number: u32) -> bool {
        self.0
            .get(&season_number)
            .and_then(|episodes| episodes.get(&episode_number))
            .is_some_and(EpisodeProgress::is_watched)
    }

    /// Watched episodes in one season
    pub fn watched_in_season(&self, season_number: u32) -> u32 {
        self.0.get(&season_number).map_or(0, |episodes| {
            episodes.values().filter(|p| p.is_watched()).count() as u32
        })
    }
}

/// Series id -> per-series watch state, for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchState(pub HashMap<u64, SeriesWatchState>);

impl WatchState {
    pub fn series(&self, series_id: u64) -> Option<&SeriesWatchState> {
        self.0.get(&series_id)
    }

    pub fn set(
        &mut self,
        series_id: u64,
        season_number: u32,
        episode_number: u32,
        progress: EpisodeProgress,
    ) {
        self.0
            .entry(series_id)
            .or_default()
            .set(season_number, episode_number, progress);
    }
}
