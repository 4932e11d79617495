//! Per-kind parameters of the synchronization engine.
//!
//! A descriptor is plain data: which documents to send, how to fill their
//! variables, and which upstream formats belong to the kind. The engine in
//! `sync_service` is written once against it.

use serde_json::{json, Map, Value};
use std::fmt;

use crate::log_debug;
use crate::modules::catalog::infrastructure::anilist::queries::*;
use crate::modules::media::application::dto::SearchCriteria;
use crate::modules::media::domain::value_objects::{
    classify, query_format, FormatClass, KindGroup, MediaKind,
};
use crate::shared::application::Paging;

/// Upstream documents for one kind group.
#[derive(Debug)]
pub struct QueryDocuments {
    pub detail: &'static str,
    pub batch: &'static str,
    pub search: &'static str,
    pub criteria: &'static str,
    pub overview: &'static str,
}

/// Server-side format restriction sent with print queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatFilter {
    pub format_in: Option<&'static [&'static str]>,
    pub format_not_in: Option<&'static [&'static str]>,
}

pub struct KindDescriptor {
    pub kind: MediaKind,
    pub group: KindGroup,
    pub documents: QueryDocuments,
    pub format_filter: FormatFilter,
    pub supports_season: bool,
    pub supports_country: bool,
    accepts_format: fn(Option<&str>) -> bool,
}

const ANIME_DOCUMENTS: QueryDocuments = QueryDocuments {
    detail: ANIME_DETAIL_QUERY,
    batch: ANIME_BATCH_QUERY,
    search: ANIME_SEARCH_QUERY,
    criteria: ANIME_CRITERIA_QUERY,
    overview: ANIME_OVERVIEW_QUERY,
};

const PRINT_DOCUMENTS: QueryDocuments = QueryDocuments {
    detail: PRINT_DETAIL_QUERY,
    batch: PRINT_BATCH_QUERY,
    search: PRINT_SEARCH_QUERY,
    criteria: PRINT_CRITERIA_QUERY,
    overview: PRINT_OVERVIEW_QUERY,
};

fn any_format(_: Option<&str>) -> bool {
    true
}

fn manga_like(format: Option<&str>) -> bool {
    classify(format) == FormatClass::MangaLike
}

fn novel_like(format: Option<&str>) -> bool {
    classify(format) == FormatClass::NovelLike
}

pub static ANIME: KindDescriptor = KindDescriptor {
    kind: MediaKind::Anime,
    group: KindGroup::Anime,
    documents: ANIME_DOCUMENTS,
    format_filter: FormatFilter {
        format_in: None,
        format_not_in: None,
    },
    supports_season: true,
    supports_country: false,
    accepts_format: any_format,
};

pub static MANGA: KindDescriptor = KindDescriptor {
    kind: MediaKind::Manga,
    group: KindGroup::Print,
    documents: PRINT_DOCUMENTS,
    format_filter: FormatFilter {
        format_in: None,
        format_not_in: Some(FormatClass::novel_filter()),
    },
    supports_season: false,
    supports_country: true,
    accepts_format: manga_like,
};

pub static NOVEL: KindDescriptor = KindDescriptor {
    kind: MediaKind::Novel,
    group: KindGroup::Print,
    documents: PRINT_DOCUMENTS,
    format_filter: FormatFilter {
        format_in: Some(FormatClass::novel_filter()),
        format_not_in: None,
    },
    supports_season: false,
    supports_country: true,
    accepts_format: novel_like,
};

impl KindDescriptor {
    pub fn for_kind(kind: MediaKind) -> &'static KindDescriptor {
        match kind {
            MediaKind::Anime => &ANIME,
            MediaKind::Manga => &MANGA,
            MediaKind::Novel => &NOVEL,
        }
    }

    /// Whether an upstream entry with this format belongs to the kind.
    pub fn accepts(&self, format: Option<&str>) -> bool {
        (self.accepts_format)(format)
    }

    pub fn upstream_type(&self) -> &'static str {
        self.group.upstream_type()
    }

    pub fn detail_variables(&self, external_id: i32) -> Value {
        let mut vars = Map::new();
        vars.insert("id".into(), json!(external_id));
        self.apply_format_filter(&mut vars);
        Value::Object(vars)
    }

    pub fn batch_variables(&self, external_ids: &[i32]) -> Value {
        let mut vars = Map::new();
        vars.insert("ids".into(), json!(external_ids));
        vars.insert("perPage".into(), json!(external_ids.len().max(1)));
        self.apply_format_filter(&mut vars);
        Value::Object(vars)
    }

    pub fn search_variables(&self, text: &str, paging: Paging) -> Value {
        let mut vars = paging_variables(paging);
        vars.insert("search".into(), json!(text));
        self.apply_format_filter(&mut vars);
        Value::Object(vars)
    }

    pub fn overview_variables(&self, external_id: i32, per_page: u32) -> Value {
        let mut vars = Map::new();
        vars.insert("id".into(), json!(external_id));
        vars.insert("perPage".into(), json!(per_page));
        self.apply_format_filter(&mut vars);
        Value::Object(vars)
    }

    /// Map criteria onto this kind's criteria document. Filters the kind does
    /// not support are dropped with a debug line.
    pub fn criteria_variables(&self, criteria: &SearchCriteria, paging: Paging) -> Value {
        let mut vars = paging_variables(paging);

        if !criteria.genres.is_empty() {
            vars.insert("genreIn".into(), json!(criteria.genres));
        }
        if let Some(status) = criteria.status {
            vars.insert("status".into(), json!(status.as_upstream()));
        }
        vars.insert("sort".into(), json!(criteria.effective_sort()));

        if self.group == KindGroup::Print {
            self.apply_format_filter(&mut vars);
        }
        if let Some(format) = criteria.format.as_deref() {
            if self.accepts(Some(format)) {
                let sent = query_format(format);
                if sent != format {
                    log_debug!("Criteria: format '{}' is queried as '{}'", format, sent);
                }
                vars.insert("formatIn".into(), json!([sent]));
            } else {
                log_debug!(
                    "Criteria: format '{}' does not belong to {}, ignoring",
                    format,
                    self.kind
                );
            }
        }

        if self.supports_season {
            if let Some(season) = criteria.season.as_deref() {
                vars.insert("season".into(), json!(season));
            }
            if let Some(year) = criteria.season_year {
                vars.insert("seasonYear".into(), json!(year));
            }
        } else if criteria.season.is_some() || criteria.season_year.is_some() {
            log_debug!("Criteria: season filter not supported for {}, ignoring", self.kind);
        }

        if let Some(country) = criteria.country_of_origin.as_deref() {
            if self.supports_country {
                vars.insert("countryOfOrigin".into(), json!(country));
            } else {
                log_debug!("Criteria: country filter not supported for {}, ignoring", self.kind);
            }
        }

        Value::Object(vars)
    }

    fn apply_format_filter(&self, vars: &mut Map<String, Value>) {
        if let Some(formats) = self.format_filter.format_in {
            vars.insert("formatIn".into(), json!(formats));
        }
        if let Some(formats) = self.format_filter.format_not_in {
            vars.insert("formatNotIn".into(), json!(formats));
        }
    }
}

impl fmt::Debug for KindDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindDescriptor")
            .field("kind", &self.kind)
            .field("group", &self.group)
            .field("format_filter", &self.format_filter)
            .finish_non_exhaustive()
    }
}

fn paging_variables(paging: Paging) -> Map<String, Value> {
    let mut vars = Map::new();
    vars.insert("page".into(), json!(paging.page()));
    vars.insert("perPage".into(), json!(paging.per_page()));
    vars
}
