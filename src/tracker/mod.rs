//! Show status and episode progress derivation.
//!
//! Everything in here is a pure function of a catalog snapshot, a watch
//! state snapshot and the caller's `today`. Nothing is cached or logged.

pub mod classifier;
pub mod dates;
pub mod progress;
pub mod renewal;
pub mod status;
pub mod types;


pub use classifier::{EpisodeTag, TagKind, classify, classify_in_series};
pub use progress::{EpisodeRef, ProgressSummary, aggregate, aggregate_with_details};
pub use renewal::{RenewalNotice, infer_renewal};
pub use status::{ShowStatus, StatusText, resolve_status, resolve_status_with};
pub use types::{
    Episode, EpisodeProgress, EpisodeType, SeasonDetails, SeasonSummary, SeriesMetadata,
    SeriesStatus, SeriesWatchState, WatchState,
};

use serde::{Deserialize, Serialize};

/// Tunable thresholds for status resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Days between the last and next episode after which the next one is
    /// announced as "Upcoming" rather than "In Season" (exclusive)
    pub midseason_gap_days: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            midseason_gap_days: 14,
        }
    }
}
