use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::modules::media::domain::{
    entities::media_record::{MediaRecord, NewMediaRecord},
    repositories::MediaRepository,
    value_objects::MediaKind,
};
use crate::shared::{application::Paging, errors::AppResult};

/// Process-local store with the same upsert and listing rules as the
/// Postgres repository. Used for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryMediaRepository {
    records: RwLock<HashMap<i32, MediaRecord>>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as is, bypassing upsert rules.
    pub async fn insert(&self, record: MediaRecord) {
        self.records.write().await.insert(record.external_id, record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn upsert_locked(records: &mut HashMap<i32, MediaRecord>, payload: NewMediaRecord) -> MediaRecord {
        let now = Utc::now();
        match records.entry(payload.external_id) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().replace_with(payload, now);
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(MediaRecord::create(payload, now)).clone(),
        }
    }
}

/// Popularity descending with unknown popularity last, then external id.
fn listing_order(a: &MediaRecord, b: &MediaRecord) -> Ordering {
    match (a.popularity, b.popularity) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.external_id.cmp(&b.external_id))
}

fn title_matches(record: &MediaRecord, needle: &str) -> bool {
    [
        &record.title_romaji,
        &record.title_english,
        &record.title_native,
    ]
    .into_iter()
    .flatten()
    .any(|title| title.to_lowercase().contains(needle))
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn find_by_external_id(&self, external_id: i32) -> AppResult<Option<MediaRecord>> {
        Ok(self.records.read().await.get(&external_id).cloned())
    }

    async fn find_many_by_external_ids(&self, external_ids: &[i32]) -> AppResult<Vec<MediaRecord>> {
        let records = self.records.read().await;
        Ok(external_ids
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }

    async fn upsert_by_external_id(&self, payload: NewMediaRecord) -> AppResult<MediaRecord> {
        let mut records = self.records.write().await;
        Ok(Self::upsert_locked(&mut records, payload))
    }

    async fn upsert_many(&self, payloads: Vec<NewMediaRecord>) -> AppResult<Vec<MediaRecord>> {
        let mut records = self.records.write().await;
        Ok(payloads
            .into_iter()
            .map(|payload| Self::upsert_locked(&mut records, payload))
            .collect())
    }

    async fn find_by_kind(
        &self,
        kinds: &[MediaKind],
        paging: Paging,
    ) -> AppResult<Vec<MediaRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<&MediaRecord> = records
            .values()
            .filter(|r| kinds.contains(&r.kind) && !r.is_deleted())
            .collect();
        matching.sort_by(|a, b| listing_order(a, b));

        Ok(matching
            .into_iter()
            .skip(paging.offset() as usize)
            .take(paging.limit() as usize)
            .cloned()
            .collect())
    }

    async fn count_by_kind(&self, kinds: &[MediaKind]) -> AppResult<i64> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| kinds.contains(&r.kind) && !r.is_deleted())
            .count() as i64)
    }

    async fn count_by_title_substring(&self, text: &str) -> AppResult<i64> {
        let needle = text.to_lowercase();
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| !r.is_deleted() && title_matches(r, &needle))
            .count() as i64)
    }
}
