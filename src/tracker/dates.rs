//! Calendar-date helpers shared by the status and progress rules.
//!
//! Every comparison happens on plain `NaiveDate`s so a time of day or a
//! local offset can never shift an episode across midnight.

use chrono::{NaiveDate, Utc};

const AIR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a catalog air date. Empty or malformed values are treated as absent.
pub fn parse(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, AIR_DATE_FORMAT).ok()
}

/// Today's date in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whether a date has aired relative to `today` (inclusive)
pub fn has_aired(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date.is_some_and(|d| d <= today)
}

/// Whole days from `earlier` to `later`; negative when reversed
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
