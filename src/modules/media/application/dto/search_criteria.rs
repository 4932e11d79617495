use serde::{Deserialize, Serialize};

use crate::modules::media::domain::value_objects::MediaStatus;

/// Sort applied when the caller gives none.
pub const DEFAULT_SORT: &str = "POPULARITY_DESC";

/// Kind-agnostic structured search filter.
///
/// Each kind maps what it supports onto its upstream variables; the rest is
/// ignored. Enumerant values (`format`, `season`, `sort`) use the upstream
/// spelling, e.g. `TV`, `WINTER`, `SCORE_DESC`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<MediaStatus>,
    pub format: Option<String>,
    /// Anime only.
    pub season: Option<String>,
    /// Anime only.
    pub season_year: Option<i32>,
    /// Manga and novels only, ISO 3166-1 alpha-2.
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl SearchCriteria {
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: MediaStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_season(mut self, season: impl Into<String>, year: Option<i32>) -> Self {
        self.season = Some(season.into());
        self.season_year = year;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country_of_origin = Some(country.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort.push(sort.into());
        self
    }

    /// Sort keys to send upstream.
    pub fn effective_sort(&self) -> Vec<String> {
        if self.sort.is_empty() {
            vec![DEFAULT_SORT.to_string()]
        } else {
            self.sort.clone()
        }
    }
}
