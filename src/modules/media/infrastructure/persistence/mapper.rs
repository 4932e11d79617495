/// Conversions between `media` rows and domain records.
///
/// JSONB list columns that fail to decode read as empty lists.
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::modules::media::domain::entities::media_record::{
    KindExtension, MediaRecord, NewMediaRecord,
};
use crate::modules::media::infrastructure::models::{MediaRow, NewMediaRow};

pub fn row_to_entity(row: MediaRow) -> MediaRecord {
    MediaRecord {
        id: row.id,
        external_id: row.external_id,
        mal_id: row.mal_id,
        kind: row.kind,
        title_romaji: row.title_romaji,
        title_english: row.title_english,
        title_native: row.title_native,
        status: row.status,
        cover_image: row.cover_image,
        banner_image: row.banner_image,
        description: row.description,
        genres: string_list(row.genres),
        tags: string_list(row.tags),
        score: row.score,
        popularity: row.popularity,
        favourites: row.favourites,
        format: row.format,
        extension: KindExtension {
            episodes: row.episodes,
            season: row.season,
            season_year: row.season_year,
            chapters: row.chapters,
            volumes: row.volumes,
            authors: string_list(row.authors),
        },
        country_of_origin: row.country_of_origin,
        last_synced_at: row.last_synced_at,
        deleted_at: row.deleted_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn payload_to_new_row(payload: NewMediaRecord, synced_at: DateTime<Utc>) -> NewMediaRow {
    let ext = payload.extension;
    NewMediaRow {
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
        genres: Value::from(payload.genres),
        tags: Value::from(payload.tags),
        score: payload.score,
        popularity: payload.popularity,
        favourites: payload.favourites,
        format: payload.format,
        episodes: ext.episodes,
        season: ext.season,
        season_year: ext.season_year,
        chapters: ext.chapters,
        volumes: ext.volumes,
        authors: Value::from(ext.authors),
        country_of_origin: payload.country_of_origin,
        last_synced_at: synced_at,
    }
}

fn string_list(value: Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}
