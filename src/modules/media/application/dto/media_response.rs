use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::media::domain::value_objects::{MediaKind, MediaStatus};

/// Media as handed to the presentation layer.
///
/// Mirrors the upstream media shape (camelCase, 0–100 score, nested title and
/// cover) plus the stored `kind`, so callers need not care whether a value
/// came from the cache or from a fresh fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    /// Upstream id.
    pub id: i32,
    pub id_mal: Option<i32>,
    pub kind: MediaKind,
    /// Upstream media type, `ANIME` or `MANGA`.
    #[serde(rename = "type")]
    pub media_type: String,
    pub format: Option<String>,
    pub status: MediaStatus,
    pub title: TitleResponse,
    pub description: Option<String>,
    pub cover_image: CoverImageResponse,
    pub banner_image: Option<String>,
    pub average_score: Option<i32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub country_of_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    pub last_synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleResponse {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImageResponse {
    pub large: Option<String>,
}
