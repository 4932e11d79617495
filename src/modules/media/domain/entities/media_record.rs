use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::media::domain::value_objects::{MediaKind, MediaStatus};

/// A cached catalog entry as stored locally.
///
/// `external_id` is the cache key and the only upsert key. `kind` is fixed
/// at creation; manga and novel rows live side by side and are told apart by
/// this tag alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
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
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    /// Normalized to [0, 10].
    pub score: Option<f32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub format: Option<String>,
    pub extension: KindExtension,
    pub country_of_origin: Option<String>,
    pub last_synced_at: DateTime<Utc>,
    /// Soft-delete marker owned by the wider application; never written here.
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields that only one kind group carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KindExtension {
    // anime
    pub episodes: Option<i32>,
    pub season: Option<String>,
    pub season_year: Option<i32>,
    // manga / novel
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub authors: Vec<String>,
}

/// Create-or-replace payload produced by the field adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMediaRecord {
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
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub score: Option<f32>,
    pub popularity: Option<i32>,
    pub favourites: Option<i32>,
    pub format: Option<String>,
    pub extension: KindExtension,
    pub country_of_origin: Option<String>,
}

impl MediaRecord {
    /// Build a fresh record from a payload, as a store does on first insert.
    pub fn create(payload: NewMediaRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: payload.external_id,
            mal_id: payload.mal_id,
            kind: payload.kind,
            title_romaji: payload.title_romaji,
            title_english: payload.title_english,
            title_native: payload.title_native,
            status: payload.status,
            cover_image: payload.cover_image,
            banner_image: payload.banner_image,
            description: payload.description,
            genres: payload.genres,
            tags: payload.tags,
            score: payload.score,
            popularity: payload.popularity,
            favourites: payload.favourites,
            format: payload.format,
            extension: payload.extension,
            country_of_origin: payload.country_of_origin,
            last_synced_at: now,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every payload-owned field. Identity, kind, creation time and the
    /// soft-delete marker survive; `last_synced_at` never moves backwards.
    pub fn replace_with(&mut self, payload: NewMediaRecord, now: DateTime<Utc>) {
        let kept = (self.id, self.kind, self.created_at, self.deleted_at);
        let previous_sync = self.last_synced_at;

        *self = Self::create(payload, now);
        (self.id, self.kind, self.created_at, self.deleted_at) = kept;
        self.last_synced_at = previous_sync.max(now);
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the record was synced within `window` of `now`.
    pub fn is_fresh(&self, window: std::time::Duration, now: DateTime<Utc>) -> bool {
        if window.is_zero() {
            return false;
        }
        match chrono::Duration::from_std(window) {
            Ok(window) => now - self.last_synced_at < window,
            Err(_) => true,
        }
    }

    /// First available title, preferring English.
    pub fn display_title(&self) -> &str {
        self.title_english
            .as_deref()
            .or(self.title_romaji.as_deref())
            .or(self.title_native.as_deref())
            .unwrap_or("")
    }
}
