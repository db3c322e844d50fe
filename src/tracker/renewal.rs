use chrono::NaiveDate;
use serde::Serialize;

use super::types::{SeriesMetadata, SeriesStatus};

/// An announced (or inferred) season that has not aired yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenewalNotice {
    pub text: String,
    pub season_number: u32,
    /// Premiere date, when the catalog already lists one
    pub date: Option<NaiveDate>,
}

impl RenewalNotice {
    fn new(season_number: u32, date: Option<NaiveDate>) -> Self {
        Self {
            text: format!("Renewed for Season {season_number}"),
            season_number,
            date,
        }
    }
}

/// Infer whether a next season has been announced.
///
/// A season listed beyond the last aired one is taken as structural evidence
/// and carries its premiere date if known. Failing that, a returning series
/// with nothing scheduled whose last aired season is also its newest one is
/// assumed renewed for the following season, undated.
pub fn infer_renewal(series: &SeriesMetadata) -> Option<RenewalNotice> {
    match series.status? {
        SeriesStatus::Ended | SeriesStatus::Canceled => return None,
        _ => {}
    }

    let last_aired_season = series.last_episode_to_air.as_ref()?.season_number;
    let max_season = series.max_season_number()?;
    let following = last_aired_season.checked_add(1)?;

    if max_season > last_aired_season {
        if let Some(season) = series.season(following) {
            return Some(RenewalNotice::new(following, season.premieres_on()));
        }
    }

    if series.status == Some(SeriesStatus::ReturningSeries)
        && series.next_episode_to_air.is_none()
        && last_aired_season == max_season
    {
        return Some(RenewalNotice::new(following, None));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::types::{Episode, SeasonSummary};

    fn returning(seasons: Vec<SeasonSummary>, last: Episode) -> SeriesMetadata {
        let mut series = SeriesMetadata::new(42, Some(SeriesStatus::ReturningSeries));
        series.seasons = seasons;
        series.last_episode_to_air = Some(last);
        series
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_finished_series_never_renewed() {
        for status in [SeriesStatus::Ended, SeriesStatus::Canceled] {
            let mut series = returning(
                vec![SeasonSummary::new(1, 10), SeasonSummary::new(2, 10)],
                Episode::new(1, 10),
            );
            series.status = Some(status);
            assert_eq!(infer_renewal(&series), None);
        }
    }

    #[test]
    fn test_missing_status_never_renewed() {
        let mut series = returning(vec![SeasonSummary::new(1, 10)], Episode::new(1, 10));
        series.status = None;
        assert_eq!(infer_renewal(&series), None);
    }

    #[test]
    fn test_listed_next_season_with_date() {
        let series = returning(
            vec![
                SeasonSummary::new(1, 10),
                SeasonSummary::new(2, 8).with_air_date("2025-03-01"),
            ],
            Episode::new(1, 10),
        );

        let renewal = infer_renewal(&series).unwrap();
        assert_eq!(renewal.text, "Renewed for Season 2");
        assert_eq!(renewal.season_number, 2);
        assert_eq!(renewal.date, Some(date("2025-03-01")));
    }

    #[test]
    fn test_listed_next_season_without_date() {
        let series = returning(
            vec![SeasonSummary::new(1, 10), SeasonSummary::new(2, 0)],
            Episode::new(1, 10),
        );

        let renewal = infer_renewal(&series).unwrap();
        assert_eq!(renewal.season_number, 2);
        assert_eq!(renewal.date, None);
    }

    #[test]
    fn test_listed_season_with_bad_date_is_undated() {
        let series = returning(
            vec![
                SeasonSummary::new(1, 10),
                SeasonSummary::new(2, 0).with_air_date("TBA"),
            ],
            Episode::new(1, 10),
        );
        assert_eq!(infer_renewal(&series).unwrap().date, None);
    }

    #[test]
    fn test_in_production_uses_structural_evidence() {
        let mut series = returning(
            vec![SeasonSummary::new(1, 10), SeasonSummary::new(2, 0)],
            Episode::new(1, 10),
        );
        series.status = Some(SeriesStatus::InProduction);
        assert_eq!(infer_renewal(&series).unwrap().season_number, 2);
    }

    #[test]
    fn test_status_fallback_when_newest_season_aired() {
        let series = returning(
            vec![SeasonSummary::new(0, 2), SeasonSummary::new(1, 10)],
            Episode::new(1, 10),
        );

        let renewal = infer_renewal(&series).unwrap();
        assert_eq!(renewal.text, "Renewed for Season 2");
        assert_eq!(renewal.date, None);
    }

    #[test]
    fn test_status_fallback_needs_no_next_episode() {
        let mut series = returning(vec![SeasonSummary::new(1, 10)], Episode::new(1, 9));
        series.next_episode_to_air = Some(Episode::new(1, 10));
        assert_eq!(infer_renewal(&series), None);
    }

    #[test]
    fn test_status_fallback_only_for_returning_series() {
        let mut series = returning(vec![SeasonSummary::new(1, 10)], Episode::new(1, 10));
        series.status = Some(SeriesStatus::Pilot);
        assert_eq!(infer_renewal(&series), None);
    }

    #[test]
    fn test_gap_in_listed_seasons_is_not_evidence() {
        // Season 3 listed but season 2 missing, so no structural match
        let series = returning(
            vec![SeasonSummary::new(1, 10), SeasonSummary::new(3, 10)],
            Episode::new(1, 10),
        );
        assert_eq!(infer_renewal(&series), None);
    }

    #[test]
    fn test_without_last_episode_nothing_inferred() {
        let mut series = returning(vec![SeasonSummary::new(1, 10)], Episode::new(1, 1));
        series.last_episode_to_air = None;
        assert_eq!(infer_renewal(&series), None);
    }

    #[test]
    fn test_last_possible_season_number_has_no_successor() {
        let mut series = SeriesMetadata::new(1, Some(SeriesStatus::ReturningSeries));
        series.seasons = vec![SeasonSummary::new(u32::MAX, 3)];
        series.last_episode_to_air = Some(Episode::new(u32::MAX, 3));

        assert_eq!(infer_renewal(&series), None);
    }
}
