use async_trait::async_trait;

use crate::modules::media::domain::{
    entities::media_record::{MediaRecord, NewMediaRecord},
    value_objects::MediaKind,
};
use crate::shared::{application::Paging, errors::AppResult};

/// Persistence boundary for cached catalog records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn find_by_external_id(&self, external_id: i32) -> AppResult<Option<MediaRecord>>;

    /// Ids with no stored row are silently omitted; order is unspecified.
    async fn find_many_by_external_ids(&self, external_ids: &[i32]) -> AppResult<Vec<MediaRecord>>;

    /// Create when absent, otherwise replace every payload field.
    /// Always stamps `last_synced_at`.
    async fn upsert_by_external_id(&self, payload: NewMediaRecord) -> AppResult<MediaRecord>;

    /// Same semantics as [`upsert_by_external_id`](Self::upsert_by_external_id)
    /// for many payloads; results follow input order.
    async fn upsert_many(&self, payloads: Vec<NewMediaRecord>) -> AppResult<Vec<MediaRecord>>;

    /// Non-deleted records of the given kinds, most popular first.
    async fn find_by_kind(&self, kinds: &[MediaKind], paging: Paging)
        -> AppResult<Vec<MediaRecord>>;

    async fn count_by_kind(&self, kinds: &[MediaKind]) -> AppResult<i64>;

    /// Case-insensitive substring match over the three title columns.
    async fn count_by_title_substring(&self, text: &str) -> AppResult<i64>;
}
