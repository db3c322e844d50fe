//! Premiere and finale badges for individual episodes.
//!
//! Finales are only ever taken from the catalog's explicit `episode_type`.
//! Premieres are read from position, since episode 1 is always a premiere.

use serde::{Deserialize, Serialize};

use super::types::{Episode, EpisodeType, SPECIALS_SEASON, SeasonSummary, SeriesMetadata};

/// Badge kinds an episode can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    #[serde(rename = "Series Finale")]
    SeriesFinale,
    #[serde(rename = "Season Finale")]
    SeasonFinale,
    #[serde(rename = "Mid-Season Finale")]
    MidSeasonFinale,
    #[serde(rename = "Series Premiere")]
    SeriesPremiere,
    #[serde(rename = "Season Premiere")]
    SeasonPremiere,
}

impl TagKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SeriesFinale => "Series Finale",
            Self::SeasonFinale => "Season Finale",
            Self::MidSeasonFinale => "Mid-Season Finale",
            Self::SeriesPremiere => "Series Premiere",
            Self::SeasonPremiere => "Season Premiere",
        }
    }

    pub const fn style_class(self) -> &'static str {
        match self {
            Self::SeriesFinale => "tag-series-finale",
            Self::SeasonFinale => "tag-season-finale",
            Self::MidSeasonFinale => "tag-midseason-finale",
            Self::SeriesPremiere => "tag-series-premiere",
            Self::SeasonPremiere => "tag-season-premiere",
        }
    }

    /// Season or series finale; mid-season breaks don't count
    pub const fn ends_season(self) -> bool {
        matches!(self, Self::SeriesFinale | Self::SeasonFinale)
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Badge shown next to an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeTag {
    pub text: TagKind,
    pub style_class: &'static str,
}

impl From<TagKind> for EpisodeTag {
    fn from(kind: TagKind) -> Self {
        Self {
            text: kind,
            style_class: kind.style_class(),
        }
    }
}

/// One classification rule
pub struct TagRule {
    pub name: &'static str,
    pub apply: fn(&Episode, &SeasonSummary) -> Option<TagKind>,
}

/// Rules in priority order; the first match wins.
pub const TAG_RULES: &[TagRule] = &[
    TagRule {
        name: "series_finale",
        apply: series_finale,
    },
    TagRule {
        name: "season_finale",
        apply: season_finale,
    },
    TagRule {
        name: "midseason_finale",
        apply: midseason_finale,
    },
    TagRule {
        name: "premiere",
        apply: premiere,
    },
];

fn series_finale(episode: &Episode, _: &SeasonSummary) -> Option<TagKind> {
    explicit(episode, EpisodeType::SeriesFinale, TagKind::SeriesFinale)
}

fn season_finale(episode: &Episode, _: &SeasonSummary) -> Option<TagKind> {
    explicit(episode, EpisodeType::SeasonFinale, TagKind::SeasonFinale)
}

fn midseason_finale(episode: &Episode, _: &SeasonSummary) -> Option<TagKind> {
    explicit(episode, EpisodeType::MidseasonFinale, TagKind::MidSeasonFinale)
}

fn premiere(episode: &Episode, season: &SeasonSummary) -> Option<TagKind> {
    if episode.episode_number != 1 {
        return None;
    }
    if season.season_number == 1 {
        Some(TagKind::SeriesPremiere)
    } else {
        Some(TagKind::SeasonPremiere)
    }
}

fn explicit(episode: &Episode, wanted: EpisodeType, kind: TagKind) -> Option<TagKind> {
    (episode.episode_type == Some(wanted)).then_some(kind)
}

/// Classify an episode within its season. Specials and unknown seasons get no tag.
pub fn classify(episode: &Episode, season: Option<&SeasonSummary>) -> Option<EpisodeTag> {
    let season = season?;
    if season.season_number == SPECIALS_SEASON {
        return None;
    }

    TAG_RULES
        .iter()
        .find_map(|rule| (rule.apply)(episode, season))
        .map(EpisodeTag::from)
}

/// Classify an episode, looking its season up on the series
pub fn classify_in_series(episode: &Episode, series: &SeriesMetadata) -> Option<EpisodeTag> {
    classify(episode, series.season(episode.season_number))
}
