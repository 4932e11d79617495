//! Read-through synchronization between the upstream catalog and the local
//! media store.
//!
//! One engine serves every kind; the per-kind differences live in
//! [`KindDescriptor`]. Single-record refreshes are coalesced per
//! (kind, external id) so concurrent cold reads make one upstream call.

use chrono::Utc;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::modules::catalog::domain::QueryExecutor;
use crate::modules::catalog::infrastructure::anilist::models::{
    ExternalMedia, ExternalPage, MediaEnvelope, OverviewEnvelope, PageEnvelope,
};
use crate::modules::media::application::{
    dto::{MediaOverview, MediaResponse, SearchCriteria},
    field_adapter::MediaFieldAdapter,
    kind_descriptor::KindDescriptor,
};
use crate::modules::media::domain::{MediaKind, MediaRecord, MediaRepository, NewMediaRecord};
use crate::shared::{
    application::{Page, PageInfo, Paging},
    config::SyncConfig,
    errors::{AppError, AppResult, UpstreamError},
    utils::{CacheDecision, LogContext, Validator},
};
use crate::{log_debug, log_info, log_warn};

type InFlight = Arc<OnceCell<AppResult<MediaResponse>>>;

pub struct MediaSyncService {
    repository: Arc<dyn MediaRepository>,
    executor: Arc<dyn QueryExecutor>,
    adapter: MediaFieldAdapter,
    config: SyncConfig,
    in_flight: DashMap<(MediaKind, i32), InFlight>,
}

impl MediaSyncService {
    pub fn new(
        repository: Arc<dyn MediaRepository>,
        executor: Arc<dyn QueryExecutor>,
        config: SyncConfig,
    ) -> Self {
        Self {
            repository,
            executor,
            adapter: MediaFieldAdapter::new(),
            config,
            in_flight: DashMap::new(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// One media entry, from the cache when fresh, otherwise refreshed.
    ///
    /// Raises `NotFound` without writing anything when upstream has no such
    /// entry or the entry belongs to another kind.
    pub async fn get_by_id(&self, kind: MediaKind, external_id: i32) -> AppResult<MediaResponse> {
        Validator::validate_external_id(external_id)?;
        let descriptor = KindDescriptor::for_kind(kind);

        match self.repository.find_by_external_id(external_id).await? {
            Some(record)
                if record.kind == kind
                    && record.is_fresh(self.config.staleness_window, Utc::now()) =>
            {
                LogContext::cache_decision(kind, external_id, CacheDecision::Fresh);
                return self
                    .adapter
                    .to_response(&record)?
                    .ok_or_else(|| not_found(kind, external_id));
            }
            Some(_) => LogContext::cache_decision(kind, external_id, CacheDecision::Stale),
            None => LogContext::cache_decision(kind, external_id, CacheDecision::Miss),
        }

        let key = (kind, external_id);
        let cell = self
            .in_flight
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_init(|| self.refresh(descriptor, external_id))
            .await
            .clone();

        self.in_flight
            .remove_if(&key, |_, current| Arc::ptr_eq(current, &cell));

        result
    }

    /// Many entries of one kind in request order. Ids that resolve nowhere
    /// are dropped; at most one upstream call is made.
    pub async fn get_many(
        &self,
        kind: MediaKind,
        external_ids: &[i32],
    ) -> AppResult<Vec<MediaResponse>> {
        let descriptor = KindDescriptor::for_kind(kind);

        let mut seen = HashSet::new();
        let mut requested: Vec<i32> = external_ids
            .iter()
            .copied()
            .filter(|id| *id > 0 && seen.insert(*id))
            .collect();
        if requested.len() > self.config.batch_limit {
            log_warn!(
                "Batch of {} {} ids exceeds limit of {}, truncating",
                requested.len(),
                kind,
                self.config.batch_limit
            );
            requested.truncate(self.config.batch_limit);
        }
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut resolved: HashMap<i32, MediaResponse> = HashMap::new();
        let cached = self.repository.find_many_by_external_ids(&requested).await?;
        let fresh: Vec<MediaRecord> = cached
            .into_iter()
            .filter(|r| r.kind == kind && r.is_fresh(self.config.staleness_window, now))
            .collect();
        for response in self.adapter.to_response_list(&fresh) {
            resolved.insert(response.id, response);
        }

        let missing: Vec<i32> = requested
            .iter()
            .copied()
            .filter(|id| !resolved.contains_key(id))
            .collect();

        if !missing.is_empty() {
            let page: PageEnvelope = self
                .query(
                    descriptor.documents.batch,
                    descriptor.batch_variables(&missing),
                    &format!("{} batch ({} ids)", kind, missing.len()),
                )
                .await?;
            let media = page.page.map(|p| p.media).unwrap_or_default();
            let payloads = self.payloads(descriptor, media);

            if !payloads.is_empty() {
                let records = retain_kind(kind, self.repository.upsert_many(payloads).await?);
                for response in self.adapter.to_response_list(&records) {
                    resolved.insert(response.id, response);
                }
            }
        }

        log_info!(
            "Resolved {}/{} {} entries ({} from cache)",
            resolved.len(),
            requested.len(),
            kind,
            requested.len() - missing.len()
        );

        Ok(requested
            .iter()
            .filter_map(|id| resolved.remove(id))
            .collect())
    }

    /// Detail aggregate for one entry. Always fetched; the base record is
    /// upserted as in [`get_by_id`](Self::get_by_id).
    pub async fn get_overview(
        &self,
        kind: MediaKind,
        external_id: i32,
    ) -> AppResult<MediaOverview> {
        Validator::validate_external_id(external_id)?;
        let descriptor = KindDescriptor::for_kind(kind);

        let data = self
            .execute_lookup(
                kind,
                external_id,
                descriptor.documents.overview,
                descriptor.overview_variables(external_id, self.config.overview_page_size),
                &format!("{} overview {}", kind, external_id),
            )
            .await?;
        let envelope: OverviewEnvelope = decode(data, "overview")?;
        let overview = envelope
            .media
            .ok_or_else(|| not_found(kind, external_id))?;

        let response = self.store_single(descriptor, overview.media.clone()).await?;
        Ok(self.adapter.to_overview(response, &overview))
    }

    /// Keyword search. Non-blank text always goes upstream and persists
    /// the hits; blank text lists the local store.
    pub async fn search(
        &self,
        kind: MediaKind,
        text: &str,
        paging: Paging,
    ) -> AppResult<Page<MediaResponse>> {
        let text = text.trim();
        if text.is_empty() {
            return self.list_local(kind, paging).await;
        }

        let descriptor = KindDescriptor::for_kind(kind);
        LogContext::search_operation(kind, text, None);

        let page: PageEnvelope = self
            .query(
                descriptor.documents.search,
                descriptor.search_variables(text, paging),
                &format!("{} search", kind),
            )
            .await?;
        let result = self.persist_page(descriptor, page, paging).await?;

        LogContext::search_operation(kind, text, Some(result.items.len()));
        Ok(result)
    }

    /// Structured search; filters the kind does not support are ignored.
    pub async fn search_by_criteria(
        &self,
        kind: MediaKind,
        criteria: &SearchCriteria,
        paging: Paging,
    ) -> AppResult<Page<MediaResponse>> {
        let descriptor = KindDescriptor::for_kind(kind);

        let page: PageEnvelope = self
            .query(
                descriptor.documents.criteria,
                descriptor.criteria_variables(criteria, paging),
                &format!("{} criteria search", kind),
            )
            .await?;
        self.persist_page(descriptor, page, paging).await
    }

    /// Cover URLs by external id. Best effort: failures yield an empty map.
    pub async fn get_covers(&self, kind: MediaKind, external_ids: &[i32]) -> HashMap<i32, String> {
        match self.get_many(kind, external_ids).await {
            Ok(items) => items
                .into_iter()
                .filter_map(|m| Some((m.id, m.cover_image.large?)))
                .collect(),
            Err(e) => {
                log_warn!("Cover lookup for {} {} ids failed: {}", external_ids.len(), kind, e);
                HashMap::new()
            }
        }
    }

    /// Scores on the 0–10 scale by external id. Best effort like
    /// [`get_covers`](Self::get_covers).
    pub async fn get_scores(&self, kind: MediaKind, external_ids: &[i32]) -> HashMap<i32, f32> {
        match self.get_many(kind, external_ids).await {
            Ok(items) => items
                .into_iter()
                .filter_map(|m| Some((m.id, m.average_score? as f32 / 10.0)))
                .collect(),
            Err(e) => {
                log_warn!("Score lookup for {} {} ids failed: {}", external_ids.len(), kind, e);
                HashMap::new()
            }
        }
    }

    /// Number of cached records whose title contains `text`.
    pub async fn count_cached(&self, text: &str) -> AppResult<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(0);
        }
        self.repository.count_by_title_substring(text).await
    }

    async fn refresh(
        &self,
        descriptor: &'static KindDescriptor,
        external_id: i32,
    ) -> AppResult<MediaResponse> {
        let kind = descriptor.kind;
        let data = self
            .execute_lookup(
                kind,
                external_id,
                descriptor.documents.detail,
                descriptor.detail_variables(external_id),
                &format!("{} detail {}", kind, external_id),
            )
            .await?;
        let envelope: MediaEnvelope = decode(data, "media")?;
        let media = envelope
            .media
            .ok_or_else(|| not_found(kind, external_id))?;

        self.store_single(descriptor, media).await
    }

    /// Validate kind membership, translate, upsert and map back.
    async fn store_single(
        &self,
        descriptor: &KindDescriptor,
        media: ExternalMedia,
    ) -> AppResult<MediaResponse> {
        let kind = descriptor.kind;
        let external_id = media.id.unwrap_or_default();

        if !descriptor.accepts(media.format.as_deref()) {
            log_warn!(
                "Upstream {} has format {:?}, which is not {}",
                external_id,
                media.format,
                kind
            );
            return Err(not_found(kind, external_id));
        }

        let payload = self.adapter.from_external(media, descriptor)?;
        let record = self.repository.upsert_by_external_id(payload).await?;
        if record.kind != kind {
            log_kind_mismatch(kind, &record);
            return Err(not_found(kind, record.external_id));
        }
        log_debug!(
            "Stored {} {} '{}'",
            kind,
            record.external_id,
            record.display_title()
        );
        self.adapter
            .to_response(&record)?
            .ok_or_else(|| not_found(kind, record.external_id))
    }

    /// Upsert one upstream page and keep upstream order and page info.
    async fn persist_page(
        &self,
        descriptor: &KindDescriptor,
        envelope: PageEnvelope,
        paging: Paging,
    ) -> AppResult<Page<MediaResponse>> {
        let ExternalPage { page_info, media } = envelope.page.unwrap_or_default();
        let page_info = page_info.unwrap_or_default();

        let payloads = self.payloads(descriptor, media);
        let records = if payloads.is_empty() {
            Vec::new()
        } else {
            retain_kind(descriptor.kind, self.repository.upsert_many(payloads).await?)
        };
        let items = self.adapter.to_response_list(&records);

        let current_page = page_info.current_page.unwrap_or(paging.page());
        let info = PageInfo {
            total: page_info.total.unwrap_or(items.len() as i64),
            current_page,
            last_page: page_info.last_page.unwrap_or(current_page),
            has_next_page: page_info.has_next_page.unwrap_or(false),
        };
        Ok(Page::new(info, items))
    }

    async fn list_local(&self, kind: MediaKind, paging: Paging) -> AppResult<Page<MediaResponse>> {
        let kinds = [kind];
        let records = self.repository.find_by_kind(&kinds, paging).await?;
        let total = self.repository.count_by_kind(&kinds).await?;
        log_debug!("Listing {} {} records from cache", records.len(), kind);

        Ok(Page::new(
            PageInfo::from_total(total, &paging),
            self.adapter.to_response_list(&records),
        ))
    }

    /// Translate a page of upstream entries, dropping other-kind and
    /// malformed ones.
    fn payloads(&self, descriptor: &KindDescriptor, media: Vec<ExternalMedia>) -> Vec<NewMediaRecord> {
        media
            .into_iter()
            .filter(|m| {
                let accepted = descriptor.accepts(m.format.as_deref());
                if !accepted {
                    log_debug!("Skipping {:?}: format {:?} is not {}", m.id, m.format, descriptor.kind);
                }
                accepted
            })
            .filter_map(|m| match self.adapter.from_external(m, descriptor) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    log_warn!("Skipping upstream {} entry: {}", descriptor.kind, e);
                    None
                }
            })
            .collect()
    }

    /// Run a single-entry lookup, mapping an upstream 404 to `NotFound`.
    async fn execute_lookup(
        &self,
        kind: MediaKind,
        external_id: i32,
        document: &str,
        variables: Value,
        label: &str,
    ) -> AppResult<Value> {
        match self.executor.execute(document, variables, label).await {
            Err(e) if e.is_upstream_not_found() => Err(not_found(kind, external_id)),
            other => other,
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: Value,
        label: &str,
    ) -> AppResult<T> {
        let data = self.executor.execute(document, variables, label).await?;
        decode(data, label)
    }
}

/// Decode the `data` object of a successful response. A shape mismatch is
/// an upstream protocol failure, not a local one.
fn decode<T: DeserializeOwned>(data: Value, what: &str) -> AppResult<T> {
    serde_json::from_value(data).map_err(|e| {
        AppError::Upstream(UpstreamError::protocol(
            200,
            format!("Failed to decode {} payload: {}", what, e),
        ))
    })
}

/// Stored kind is fixed at creation; records upstream has since moved to
/// another kind are not served under the requested one.
fn retain_kind(kind: MediaKind, records: Vec<MediaRecord>) -> Vec<MediaRecord> {
    records
        .into_iter()
        .filter(|record| {
            let matches = record.kind == kind;
            if !matches {
                log_kind_mismatch(kind, record);
            }
            matches
        })
        .collect()
}

fn log_kind_mismatch(kind: MediaKind, record: &MediaRecord) {
    log_warn!(
        "Media {} is stored as {} but upstream now lists it as {}, not serving it",
        record.external_id,
        record.kind,
        kind
    );
}

fn not_found(kind: MediaKind, external_id: i32) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, external_id))
}
