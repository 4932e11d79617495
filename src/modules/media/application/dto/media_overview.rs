use serde::{Deserialize, Serialize};

use super::media_response::{MediaResponse, TitleResponse};

/// Detail-page aggregate: the stored media plus first-page previews of its
/// related data. Only `media` is persisted; the rest is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaOverview {
    pub media: MediaResponse,
    pub relations: Vec<RelatedMedia>,
    pub characters: Vec<PersonPreview>,
    pub staff: Vec<PersonPreview>,
    pub score_distribution: Vec<ScoreBucket>,
    pub status_distribution: Vec<StatusBucket>,
    pub rankings: Vec<Ranking>,
    pub recommendations: Vec<Recommendation>,
}

/// Compact reference to another upstream media entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSummary {
    pub id: i32,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub title: TitleResponse,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedMedia {
    pub relation_type: Option<String>,
    pub media: MediaSummary,
}

/// A character or staff member with their role on this media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPreview {
    pub id: i32,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    pub score: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub status: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub rank: i32,
    #[serde(rename = "type")]
    pub ranking_type: Option<String>,
    pub format: Option<String>,
    pub year: Option<i32>,
    pub season: Option<String>,
    pub all_time: bool,
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub rating: i32,
    pub media: MediaSummary,
}
