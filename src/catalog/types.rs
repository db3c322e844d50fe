use serde::{Deserialize, Serialize};

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Some(Self::Movie),
            "tv" | "show" | "shows" | "series" => Some(Self::Tv),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search hit from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub media_type: MediaType,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    /// Rating (0-10 scale)
    pub rating: Option<f64>,
    pub popularity: Option<f64>,
    pub provider: String,
}

impl CatalogItem {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        media_type: MediaType,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            original_title: None,
            media_type,
            year: None,
            poster_url: None,
            overview: None,
            rating: None,
            popularity: None,
            provider: provider.into(),
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_original_title(mut self, title: Option<String>) -> Self {
        self.original_title = title;
        self
    }

    pub fn with_poster(mut self, url: Option<String>) -> Self {
        self.poster_url = url;
        self
    }

    pub fn with_overview(mut self, overview: Option<String>) -> Self {
        self.overview = overview;
        self
    }

    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_popularity(mut self, popularity: Option<f64>) -> Self {
        self.popularity = popularity;
        self
    }
}

/// Movie detail snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD)
    pub release_date: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub rating: Option<f64>,
}

/// Year from a `YYYY-MM-DD` date string
pub(crate) fn year_of(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| d.split('-').next())
        .and_then(|y| y.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parse() {
        assert_eq!(MediaType::parse("Movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::parse("series"), Some(MediaType::Tv));
        assert_eq!(MediaType::parse("anime"), None);
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("2008-01-20")), Some(2008));
        assert_eq!(year_of(Some("")), None);
        assert_eq!(year_of(None), None);
    }
}
