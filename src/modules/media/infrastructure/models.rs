use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::modules::media::domain::value_objects::{MediaKind, MediaStatus};
use crate::schema::media;

// ================== MEDIA MODELS ==================

/// Full `media` row. Field order follows the table definition.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = media)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MediaRow {
    pub id: Uuid,
    pub external_id: i32,
    pub mal_id: Option<i32>,
    pub kind: MediaKind,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub title_native: Option<String>,
    pub status: MediaStatus,
    pub cover_image: Option<String>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub genres: serde_json::Value,
    pub tags: serde_json::Value,
    pub score: Option<f32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub format: Option<String>,
    pub episodes: Option<i32>,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub authors: serde_json::Value,
    pub country_of_origin: Option<String>,
    pub last_synced_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert half of an upsert. `deleted_at` is never written here and the
/// creation timestamps come from column defaults.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = media)]
pub struct NewMediaRow {
    pub id: Uuid,
    pub external_id: i32,
    pub mal_id: Option<i32>,
    pub kind: MediaKind,
    pub title_romaji: Option<String>,
    pub title_english: Option<String>,
    pub title_native: Option<String>,
    pub status: MediaStatus,
    pub cover_image: Option<String>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub genres: serde_json::Value,
    pub tags: serde_json::Value,
    pub score: Option<f32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub format: Option<String>,
    pub episodes: Option<i32>,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub authors: serde_json::Value,
    pub country_of_origin: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}
