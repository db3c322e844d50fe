//! Lifecycle status of a series.
//!
//! Resolution walks [`STATUS_RULES`] top to bottom and stops at the first rule
//! that produces a status. The order is significant: an explicit end state
//! always beats air dates, and an upcoming finale beats the gap heuristics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    TrackerConfig,
    classifier::classify_in_series,
    dates,
    renewal::infer_renewal,
    types::{Episode, SeriesMetadata, SeriesStatus},
};

/// Display state of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusText {
    Ended,
    Canceled,
    Upcoming,
    #[serde(rename = "On Hiatus")]
    OnHiatus,
    #[serde(rename = "In Season")]
    InSeason,
    #[serde(rename = "In Production")]
    InProduction,
}

impl std::fmt::Display for StatusText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ended => write!(f, "Ended"),
            Self::Canceled => write!(f, "Canceled"),
            Self::Upcoming => write!(f, "Upcoming"),
            Self::OnHiatus => write!(f, "On Hiatus"),
            Self::InSeason => write!(f, "In Season"),
            Self::InProduction => write!(f, "In Production"),
        }
    }
}

/// Resolved status with the date it refers to, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowStatus {
    pub text: StatusText,
    pub date: Option<NaiveDate>,
}

impl ShowStatus {
    pub const fn new(text: StatusText) -> Self {
        Self { text, date: None }
    }

    pub const fn on(text: StatusText, date: NaiveDate) -> Self {
        Self {
            text,
            date: Some(date),
        }
    }
}

/// Everything a status rule may look at
pub struct StatusInput<'a> {
    pub series: &'a SeriesMetadata,
    pub today: NaiveDate,
    pub config: &'a TrackerConfig,
}

impl StatusInput<'_> {
    /// Next episode with a known air date of today or later
    fn scheduled_next(&self) -> Option<(&Episode, NaiveDate)> {
        let next = self.series.next_episode_to_air.as_ref()?;
        let airs = next.aired_on()?;
        (airs >= self.today).then_some((next, airs))
    }
}

/// One entry of the status decision list
pub struct StatusRule {
    pub name: &'static str,
    pub apply: fn(&StatusInput<'_>) -> Option<ShowStatus>,
}

/// Status rules in evaluation order
pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        name: "ended",
        apply: ended,
    },
    StatusRule {
        name: "canceled",
        apply: canceled,
    },
    StatusRule {
        name: "never_aired",
        apply: never_aired,
    },
    StatusRule {
        name: "next_episode",
        apply: next_episode,
    },
    StatusRule {
        name: "returning_series",
        apply: returning_series,
    },
    StatusRule {
        name: "in_production",
        apply: in_production,
    },
    StatusRule {
        name: "fallback",
        apply: fallback,
    },
];

fn ended(input: &StatusInput<'_>) -> Option<ShowStatus> {
    (input.series.status == Some(SeriesStatus::Ended)).then_some(ShowStatus::new(StatusText::Ended))
}

fn canceled(input: &StatusInput<'_>) -> Option<ShowStatus> {
    (input.series.status == Some(SeriesStatus::Canceled))
        .then_some(ShowStatus::new(StatusText::Canceled))
}

fn never_aired(input: &StatusInput<'_>) -> Option<ShowStatus> {
    if input.series.last_episode_to_air.is_some() {
        return None;
    }
    let premiere = input.series.first_aired_on()?;
    (premiere > input.today).then_some(ShowStatus::on(StatusText::Upcoming, premiere))
}

fn next_episode(input: &StatusInput<'_>) -> Option<ShowStatus> {
    let (next, airs) = input.scheduled_next()?;

    if classify_in_series(next, input.series).is_some_and(|tag| tag.text.ends_season()) {
        return Some(ShowStatus::on(StatusText::OnHiatus, airs));
    }

    let last_aired = input
        .series
        .last_episode_to_air
        .as_ref()
        .and_then(Episode::aired_on);
    if let Some(last) = last_aired {
        if dates::days_between(last, airs) > input.config.midseason_gap_days {
            return Some(ShowStatus::on(StatusText::Upcoming, airs));
        }
    }

    if next.episode_number == 1 {
        return Some(ShowStatus::on(StatusText::Upcoming, airs));
    }

    Some(ShowStatus::on(StatusText::InSeason, airs))
}

fn returning_series(input: &StatusInput<'_>) -> Option<ShowStatus> {
    if input.series.status != Some(SeriesStatus::ReturningSeries) {
        return None;
    }

    let status = match infer_renewal(input.series) {
        Some(renewal) => match renewal.date {
            Some(date) => ShowStatus::on(StatusText::Upcoming, date),
            None => ShowStatus::new(StatusText::OnHiatus),
        },
        None => ShowStatus::new(StatusText::OnHiatus),
    };
    Some(status)
}

fn in_production(input: &StatusInput<'_>) -> Option<ShowStatus> {
    matches!(
        input.series.status,
        Some(SeriesStatus::InProduction | SeriesStatus::Pilot)
    )
    .then_some(ShowStatus::new(StatusText::InProduction))
}

fn fallback(_: &StatusInput<'_>) -> Option<ShowStatus> {
    Some(ShowStatus::new(StatusText::OnHiatus))
}

/// Resolve a series' status with the default thresholds
pub fn resolve_status(series: &SeriesMetadata, today: NaiveDate) -> Option<ShowStatus> {
    resolve_status_with(series, today, &TrackerConfig::default())
}

/// Resolve a series' status. Returns `None` when the catalog gave no status.
pub fn resolve_status_with(
    series: &SeriesMetadata,
    today: NaiveDate,
    config: &TrackerConfig,
) -> Option<ShowStatus> {
    series.status?;

    let input = StatusInput {
        series,
        today,
        config,
    };
    STATUS_RULES.iter().find_map(|rule| (rule.apply)(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::types::{EpisodeType, SeasonSummary};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series(status: SeriesStatus) -> SeriesMetadata {
        let mut series = SeriesMetadata::new(7, Some(status));
        series.first_air_date = Some("2020-01-01".to_string());
        series.seasons = vec![
            SeasonSummary::new(0, 3),
            SeasonSummary::new(1, 10),
            SeasonSummary::new(2, 10),
        ];
        series
    }

    const TODAY: &str = "2024-06-01";

    fn resolve(series: &SeriesMetadata) -> Option<ShowStatus> {
        resolve_status(series, date(TODAY))
    }

    #[test]
    fn test_missing_status_resolves_nothing() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.status = None;
        assert_eq!(resolve(&s), None);
    }

    #[test]
    fn test_ended_ignores_air_dates() {
        let mut s = series(SeriesStatus::Ended);
        s.next_episode_to_air = Some(Episode::new(2, 3).with_air_date("2024-06-10"));
        s.last_episode_to_air = Some(Episode::new(2, 2).with_air_date("2024-06-03"));
        s.first_air_date = Some("2030-01-01".to_string());
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::Ended)));
    }

    #[test]
    fn test_canceled() {
        let mut s = series(SeriesStatus::Canceled);
        s.next_episode_to_air = Some(Episode::new(2, 3).with_air_date("2024-06-10"));
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::Canceled)));
    }

    #[test]
    fn test_never_aired_is_upcoming_on_premiere() {
        let mut s = series(SeriesStatus::InProduction);
        s.first_air_date = Some("2024-09-15".to_string());
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::Upcoming, date("2024-09-15")))
        );
    }

    #[test]
    fn test_first_air_date_ignored_once_episodes_aired() {
        let mut s = series(SeriesStatus::InProduction);
        s.first_air_date = Some("2024-09-15".to_string());
        s.last_episode_to_air = Some(Episode::new(1, 1).with_air_date("2024-05-01"));
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::InProduction)));
    }

    #[test]
    fn test_upcoming_finale_means_hiatus() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 9).with_air_date("2024-05-28"));
        s.next_episode_to_air = Some(
            Episode::new(2, 10)
                .with_air_date("2024-06-04")
                .with_type(EpisodeType::SeasonFinale),
        );
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::OnHiatus, date("2024-06-04")))
        );
    }

    #[test]
    fn test_midseason_finale_keeps_in_season() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-05-28"));
        s.next_episode_to_air = Some(
            Episode::new(2, 5)
                .with_air_date("2024-06-04")
                .with_type(EpisodeType::MidseasonFinale),
        );
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::InSeason, date("2024-06-04")))
        );
    }

    #[test]
    fn test_gap_over_threshold_is_upcoming() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-05-25"));
        s.next_episode_to_air = Some(Episode::new(2, 5).with_air_date("2024-06-14"));
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::Upcoming, date("2024-06-14")))
        );
    }

    #[test]
    fn test_gap_of_exactly_threshold_stays_in_season() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-05-25"));
        s.next_episode_to_air = Some(Episode::new(2, 5).with_air_date("2024-06-08"));
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::InSeason, date("2024-06-08")))
        );
    }

    #[test]
    fn test_gap_threshold_is_configurable() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-05-25"));
        s.next_episode_to_air = Some(Episode::new(2, 5).with_air_date("2024-06-08"));

        let config = TrackerConfig {
            midseason_gap_days: 7,
        };
        assert_eq!(
            resolve_status_with(&s, date(TODAY), &config),
            Some(ShowStatus::on(StatusText::Upcoming, date("2024-06-08")))
        );
    }

    #[test]
    fn test_next_premiere_is_upcoming() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.next_episode_to_air = Some(Episode::new(2, 1).with_air_date("2024-06-05"));
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::Upcoming, date("2024-06-05")))
        );
    }

    #[test]
    fn test_weekly_episode_is_in_season() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 3).with_air_date("2024-05-29"));
        s.next_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-06-05"));
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::InSeason, date("2024-06-05")))
        );
    }

    #[test]
    fn test_next_airing_today_counts_as_scheduled() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 3).with_air_date("2024-05-25"));
        s.next_episode_to_air = Some(Episode::new(2, 4).with_air_date(TODAY));
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::InSeason, date(TODAY)))
        );
    }

    #[test]
    fn test_stale_next_episode_falls_through() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.seasons = vec![SeasonSummary::new(1, 10), SeasonSummary::new(2, 10)];
        s.last_episode_to_air = Some(Episode::new(2, 3).with_air_date("2024-05-01"));
        s.next_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-05-08"));
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::OnHiatus)));
    }

    #[test]
    fn test_undated_next_episode_falls_through() {
        let mut s = series(SeriesStatus::InProduction);
        s.last_episode_to_air = Some(Episode::new(1, 10).with_air_date("2023-05-01"));
        s.next_episode_to_air = Some(Episode::new(2, 1));
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::InProduction)));
    }

    #[test]
    fn test_returning_with_dated_renewal_is_upcoming() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.seasons[2] = SeasonSummary::new(2, 10).with_air_date("2024-10-01");
        s.last_episode_to_air = Some(Episode::new(1, 10).with_air_date("2024-01-01"));
        assert_eq!(
            resolve(&s),
            Some(ShowStatus::on(StatusText::Upcoming, date("2024-10-01")))
        );
    }

    #[test]
    fn test_returning_with_undated_renewal_is_hiatus() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(1, 10).with_air_date("2024-01-01"));
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::OnHiatus)));
    }

    #[test]
    fn test_pilot_is_in_production() {
        let mut s = series(SeriesStatus::Pilot);
        s.first_air_date = None;
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::InProduction)));
    }

    #[test]
    fn test_unrecognised_status_defaults_to_hiatus() {
        let s = series(SeriesStatus::Other);
        assert_eq!(resolve(&s), Some(ShowStatus::new(StatusText::OnHiatus)));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut s = series(SeriesStatus::ReturningSeries);
        s.last_episode_to_air = Some(Episode::new(2, 3).with_air_date("2024-05-29"));
        s.next_episode_to_air = Some(Episode::new(2, 4).with_air_date("2024-06-05"));
        assert_eq!(resolve(&s), resolve(&s));
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = STATUS_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "ended",
                "canceled",
                "never_aired",
                "next_episode",
                "returning_series",
                "in_production",
                "fallback",
            ]
        );
    }

    #[test]
    fn test_status_serializes_display_text() {
        let status = ShowStatus::on(StatusText::InSeason, date("2024-06-05"));
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["text"], "In Season");
        assert_eq!(json["date"], "2024-06-05");
    }
}
