use chrono::NaiveDate;
use serde::Serialize;

use super::{
    dates,
    types::{SPECIALS_SEASON, SeasonDetails, SeriesMetadata, SeriesWatchState, WatchState},
};

/// Position of an episode within a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EpisodeRef {
    pub season_number: u32,
    pub episode_number: u32,
}

/// Watched/aired counts for one series and its current season
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub overall_percent: f64,
    pub total_aired: u32,
    pub watched_total: u32,
    pub season_percent: f64,
    pub episodes_left_in_season: u32,
    /// `None` when nothing is left to catch up on
    pub current_season_number: Option<u32>,
    pub next_episode: Option<EpisodeRef>,
}

/// Aired episodes of one season, judged by the last aired episode's position
pub fn aired_in_season(series: &SeriesMetadata, season_number: u32) -> u32 {
    if season_number == SPECIALS_SEASON {
        return 0;
    }
    let Some(last) = series.last_episode_to_air.as_ref() else {
        return 0;
    };
    let Some(season) = series.season(season_number) else {
        return 0;
    };

    if season_number < last.season_number {
        season.episode_count
    } else if season_number == last.season_number {
        last.episode_number.min(season.episode_count)
    } else {
        0
    }
}

/// Aired episodes across all regular seasons
pub fn total_aired(series: &SeriesMetadata) -> u32 {
    series
        .regular_seasons()
        .iter()
        .map(|s| aired_in_season(series, s.season_number))
        .fold(0, u32::saturating_add)
}

/// Watched episodes outside specials, aired or not
pub fn watched_total(watch: &SeriesWatchState) -> u32 {
    watch
        .0
        .keys()
        .filter(|season| **season != SPECIALS_SEASON)
        .map(|season| watch.watched_in_season(*season))
        .fold(0, u32::saturating_add)
}

/// `part / whole * 100`, or 0 when nothing has aired
pub fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

/// Aired episode numbers of one season, ascending.
///
/// A full listing in `details` is judged by each episode's air date;
/// otherwise positions `1..=aired` from the series summary are used.
pub fn aired_episodes(
    series: &SeriesMetadata,
    details: &[SeasonDetails],
    season_number: u32,
    today: NaiveDate,
) -> Vec<u32> {
    if season_number == SPECIALS_SEASON {
        return Vec::new();
    }
    match details.iter().find(|d| d.season_number == season_number) {
        Some(listing) => {
            let mut aired: Vec<u32> = listing
                .episodes
                .iter()
                .filter(|e| dates::has_aired(e.aired_on(), today))
                .map(|e| e.episode_number)
                .collect();
            aired.sort_unstable();
            aired.dedup();
            aired
        }
        None => (1..=aired_in_season(series, season_number)).collect(),
    }
}

/// First aired episode the user hasn't watched, in season then episode order
pub fn next_unwatched(
    series: &SeriesMetadata,
    details: &[SeasonDetails],
    watch: &SeriesWatchState,
    today: NaiveDate,
) -> Option<EpisodeRef> {
    series.regular_seasons().into_iter().find_map(|season| {
        let season_number = season.season_number;
        aired_episodes(series, details, season_number, today)
            .into_iter()
            .find(|ep| !watch.is_watched(season_number, *ep))
            .map(|episode_number| EpisodeRef {
                season_number,
                episode_number,
            })
    })
}

/// Progress for a series from its summary alone
pub fn aggregate(
    series: &SeriesMetadata,
    watch: &WatchState,
    target_season: Option<u32>,
    today: NaiveDate,
) -> ProgressSummary {
    aggregate_with_details(series, &[], watch, target_season, today)
}

/// Progress for a series, using per-season listings where available.
///
/// `target_season` pins the seasonal breakdown, e.g. to the season of a
/// paused episode; otherwise the season of the next unwatched episode is used.
pub fn aggregate_with_details(
    series: &SeriesMetadata,
    details: &[SeasonDetails],
    watch: &WatchState,
    target_season: Option<u32>,
    today: NaiveDate,
) -> ProgressSummary {
    let empty = SeriesWatchState::default();
    let watch = watch.series(series.id).unwrap_or(&empty);

    let total_aired = total_aired(series);
    let watched_total = watched_total(watch);
    let next_episode = next_unwatched(series, details, watch, today);

    let mut summary = ProgressSummary {
        overall_percent: percent(watched_total, total_aired),
        total_aired,
        watched_total,
        next_episode,
        ..Default::default()
    };

    let current = target_season
        .filter(|s| *s != SPECIALS_SEASON)
        .or_else(|| next_episode.map(|e| e.season_number));

    if let Some(season_number) = current {
        let aired = aired_episodes(series, details, season_number, today);
        let watched = watch.watched_in_season(season_number);
        let left = aired
            .iter()
            .filter(|ep| !watch.is_watched(season_number, **ep))
            .count();

        summary.current_season_number = Some(season_number);
        summary.season_percent = percent(watched, u32::try_from(aired.len()).unwrap_or(u32::MAX));
        summary.episodes_left_in_season = u32::try_from(left).unwrap_or(u32::MAX);
    }

    summary
}
