use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task;

use super::mapper::{payload_to_new_row, row_to_entity};
use crate::modules::media::domain::{
    entities::media_record::{MediaRecord, NewMediaRecord},
    repositories::MediaRepository,
    value_objects::MediaKind,
};
use crate::modules::media::infrastructure::models::{MediaRow, NewMediaRow};
use crate::schema::media;
use crate::shared::{
    application::Paging,
    database::{Database, DbConnection},
    errors::{AppError, AppResult},
    utils::TimedOperation,
};
use crate::log_debug;

diesel::define_sql_function! {
    /// Postgres GREATEST over two timestamps.
    fn greatest(a: diesel::sql_types::Timestamptz, b: diesel::sql_types::Timestamptz) -> diesel::sql_types::Timestamptz;
}

/// Postgres-backed [`MediaRepository`].
///
/// Upserts go through `INSERT .. ON CONFLICT (external_id) DO UPDATE` so
/// concurrent writers for the same id never produce a second row.
pub struct MediaRepositoryImpl {
    db: Arc<Database>,
}

impl MediaRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// `kind`, `id`, `created_at` and `deleted_at` are left untouched on
    /// conflict. `last_synced_at` never moves backwards.
    fn upsert_rows(conn: &mut DbConnection, rows: &[NewMediaRow]) -> AppResult<Vec<MediaRow>> {
        let stored = diesel::insert_into(media::table)
            .values(rows)
            .on_conflict(media::external_id)
            .do_update()
            .set((
                media::mal_id.eq(excluded(media::mal_id)),
                media::title_romaji.eq(excluded(media::title_romaji)),
                media::title_english.eq(excluded(media::title_english)),
                media::title_native.eq(excluded(media::title_native)),
                media::status.eq(excluded(media::status)),
                media::cover_image.eq(excluded(media::cover_image)),
                media::banner_image.eq(excluded(media::banner_image)),
                media::description.eq(excluded(media::description)),
                media::genres.eq(excluded(media::genres)),
                media::tags.eq(excluded(media::tags)),
                media::score.eq(excluded(media::score)),
                media::popularity.eq(excluded(media::popularity)),
                media::favourites.eq(excluded(media::favourites)),
                media::format.eq(excluded(media::format)),
                media::episodes.eq(excluded(media::episodes)),
                media::season.eq(excluded(media::season)),
                media::season_year.eq(excluded(media::season_year)),
                media::chapters.eq(excluded(media::chapters)),
                media::volumes.eq(excluded(media::volumes)),
                media::authors.eq(excluded(media::authors)),
                media::country_of_origin.eq(excluded(media::country_of_origin)),
                media::last_synced_at.eq(greatest(
                    media::last_synced_at,
                    excluded(media::last_synced_at),
                )),
                media::updated_at.eq(Utc::now()),
            ))
            .returning(MediaRow::as_returning())
            .get_results(conn)?;

        Ok(stored)
    }
}

/// One row per external id, last payload wins. Postgres rejects an
/// `ON CONFLICT DO UPDATE` statement that touches the same row twice.
fn dedupe_payloads(payloads: Vec<NewMediaRecord>) -> Vec<NewMediaRecord> {
    let mut positions: HashMap<i32, usize> = HashMap::new();
    let mut unique: Vec<NewMediaRecord> = Vec::with_capacity(payloads.len());

    for payload in payloads {
        match positions.get(&payload.external_id) {
            Some(&index) => unique[index] = payload,
            None => {
                positions.insert(payload.external_id, unique.len());
                unique.push(payload);
            }
        }
    }
    unique
}

/// `%` and `_` in user text match literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl MediaRepository for MediaRepositoryImpl {
    async fn find_by_external_id(&self, external_id: i32) -> AppResult<Option<MediaRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Option<MediaRecord>> {
            let mut conn = db.get_connection()?;

            let row = media::table
                .filter(media::external_id.eq(external_id))
                .select(MediaRow::as_select())
                .first::<MediaRow>(&mut conn)
                .optional()?;

            Ok(row.map(row_to_entity))
        })
        .await?
    }

    async fn find_many_by_external_ids(&self, external_ids: &[i32]) -> AppResult<Vec<MediaRecord>> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        let ids = external_ids.to_vec();

        task::spawn_blocking(move || -> AppResult<Vec<MediaRecord>> {
            let timer = TimedOperation::new("find_many_by_external_ids");
            let mut conn = db.get_connection()?;

            let rows = media::table
                .filter(media::external_id.eq_any(ids))
                .select(MediaRow::as_select())
                .load::<MediaRow>(&mut conn)?;

            timer.finish();
            Ok(rows.into_iter().map(row_to_entity).collect())
        })
        .await?
    }

    async fn upsert_by_external_id(&self, payload: NewMediaRecord) -> AppResult<MediaRecord> {
        let external_id = payload.external_id;
        self.upsert_many(vec![payload])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::DatabaseError(format!("Upsert of media {} returned no row", external_id))
            })
    }

    async fn upsert_many(&self, payloads: Vec<NewMediaRecord>) -> AppResult<Vec<MediaRecord>> {
        if payloads.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<Vec<MediaRecord>> {
            let timer = TimedOperation::new("upsert_many");
            let mut conn = db.get_connection()?;

            let synced_at = Utc::now();
            let order: Vec<i32> = payloads.iter().map(|p| p.external_id).collect();
            let rows: Vec<NewMediaRow> = dedupe_payloads(payloads)
                .into_iter()
                .map(|payload| payload_to_new_row(payload, synced_at))
                .collect();

            let stored = conn.transaction::<_, AppError, _>(|conn| Self::upsert_rows(conn, &rows))?;

            let by_id: HashMap<i32, MediaRecord> = stored
                .into_iter()
                .map(|row| (row.external_id, row_to_entity(row)))
                .collect();

            // Input order, one entry per input payload.
            let mut records = Vec::with_capacity(order.len());
            for external_id in order {
                if let Some(record) = by_id.get(&external_id) {
                    records.push(record.clone());
                }
            }

            timer.finish();
            log_debug!("Upserted {} media rows", records.len());
            Ok(records)
        })
        .await?
    }

    async fn find_by_kind(
        &self,
        kinds: &[MediaKind],
        paging: Paging,
    ) -> AppResult<Vec<MediaRecord>> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        let kinds = kinds.to_vec();

        task::spawn_blocking(move || -> AppResult<Vec<MediaRecord>> {
            let timer = TimedOperation::new("find_by_kind");
            let mut conn = db.get_connection()?;

            let rows = media::table
                .filter(media::kind.eq_any(kinds))
                .filter(media::deleted_at.is_null())
                .order((media::popularity.desc().nulls_last(), media::external_id.asc()))
                .limit(paging.limit())
                .offset(paging.offset())
                .select(MediaRow::as_select())
                .load::<MediaRow>(&mut conn)?;

            timer.finish();
            Ok(rows.into_iter().map(row_to_entity).collect())
        })
        .await?
    }

    async fn count_by_kind(&self, kinds: &[MediaKind]) -> AppResult<i64> {
        if kinds.is_empty() {
            return Ok(0);
        }
        let db = Arc::clone(&self.db);
        let kinds = kinds.to_vec();

        task::spawn_blocking(move || -> AppResult<i64> {
            let mut conn = db.get_connection()?;

            let count = media::table
                .filter(media::kind.eq_any(kinds))
                .filter(media::deleted_at.is_null())
                .count()
                .get_result::<i64>(&mut conn)?;

            Ok(count)
        })
        .await?
    }

    async fn count_by_title_substring(&self, text: &str) -> AppResult<i64> {
        let db = Arc::clone(&self.db);
        let pattern = like_pattern(text);

        task::spawn_blocking(move || -> AppResult<i64> {
            let timer = TimedOperation::new("count_by_title_substring");
            let mut conn = db.get_connection()?;

            let count = media::table
                .filter(media::deleted_at.is_null())
                .filter(
                    media::title_romaji
                        .ilike(pattern.clone())
                        .or(media::title_english.ilike(pattern.clone()))
                        .or(media::title_native.ilike(pattern)),
                )
                .count()
                .get_result::<i64>(&mut conn)?;

            timer.finish();
            Ok(count)
        })
        .await?
    }
}
