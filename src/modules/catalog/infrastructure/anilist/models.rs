//! AniList GraphQL models
//!
//! Enumerants (type, format, status, season) stay as raw strings: the format
//! classifier and the status mapper must see values this crate does not know
//! about yet.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Main Media type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMedia {
    pub id: Option<i32>,
    pub id_mal: Option<i32>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub title: Option<MediaTitle>,
    pub description: Option<String>,
    pub cover_image: Option<MediaCoverImage>,
    pub banner_image: Option<String>,
    /// 0–100 upstream. Anything that is not a JSON number reads as absent.
    #[serde(default, deserialize_with = "lenient_number")]
    pub average_score: Option<f64>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<MediaTag>>,
    pub country_of_origin: Option<String>,
    // anime
    pub episodes: Option<i32>,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    // manga / novel
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub staff: Option<StaffConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaCoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaTag {
    pub name: Option<String>,
    pub rank: Option<i32>,
    pub is_media_spoiler: Option<bool>,
}

// Staff structures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StaffConnection {
    #[serde(default)]
    pub edges: Vec<StaffEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StaffEdge {
    pub role: Option<String>,
    pub node: Option<PersonNode>,
}

/// Staff member or character; both carry a name and an image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonNode {
    pub id: Option<i32>,
    pub name: Option<PersonName>,
    pub image: Option<PersonImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonName {
    pub full: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonImage {
    pub medium: Option<String>,
}

// Overview structures
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalOverview {
    #[serde(flatten)]
    pub media: ExternalMedia,
    pub relations: Option<RelationConnection>,
    pub characters: Option<CharacterConnection>,
    pub staff_preview: Option<StaffConnection>,
    pub stats: Option<MediaStats>,
    pub rankings: Option<Vec<MediaRank>>,
    pub recommendations: Option<RecommendationConnection>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct RelationConnection {
    #[serde(default)]
    pub edges: Vec<RelationEdge>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RelationEdge {
    pub relation_type: Option<String>,
    pub node: Option<MediaNode>,
}

/// Compact media reference used inside relations and recommendations.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaNode {
    pub id: Option<i32>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub title: Option<MediaTitle>,
    pub cover_image: Option<MediaCoverImage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct CharacterConnection {
    #[serde(default)]
    pub edges: Vec<CharacterEdge>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct CharacterEdge {
    pub role: Option<String>,
    pub node: Option<PersonNode>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaStats {
    #[serde(default)]
    pub score_distribution: Vec<ScoreDistribution>,
    #[serde(default)]
    pub status_distribution: Vec<StatusDistribution>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ScoreDistribution {
    pub score: Option<i32>,
    pub amount: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct StatusDistribution {
    pub status: Option<String>,
    pub amount: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaRank {
    pub id: Option<i32>,
    pub rank: Option<i32>,
    #[serde(rename = "type")]
    pub rank_type: Option<String>,
    pub format: Option<String>,
    pub year: Option<i32>,
    pub season: Option<String>,
    pub all_time: Option<bool>,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct RecommendationConnection {
    #[serde(default)]
    pub nodes: Vec<RecommendationNode>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationNode {
    pub rating: Option<i32>,
    pub media_recommendation: Option<MediaNode>,
}

// Query response structures
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlEnvelope {
    pub data: Option<Value>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    pub status: Option<u16>,
}

// Page wrapper for paginated queries
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPage {
    pub page_info: Option<ExternalPageInfo>,
    #[serde(default)]
    pub media: Vec<ExternalMedia>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPageInfo {
    pub total: Option<i64>,
    pub per_page: Option<u32>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub has_next_page: Option<bool>,
}

// Response wrapper types for GraphQL queries
#[derive(Debug, Clone, Deserialize)]
pub struct MediaEnvelope {
    #[serde(rename = "Media")]
    pub media: Option<ExternalMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverviewEnvelope {
    #[serde(rename = "Media")]
    pub media: Option<ExternalOverview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope {
    #[serde(rename = "Page")]
    pub page: Option<ExternalPage>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_f64()))
}
