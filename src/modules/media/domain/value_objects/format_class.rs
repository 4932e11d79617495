//! Partition of upstream print formats into the two kinds that share storage.

use serde::{Deserialize, Serialize};

use super::media_kind::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatClass {
    MangaLike,
    NovelLike,
}

/// Formats classified as novels. Everything else is manga-like.
const NOVEL_FORMATS: &[&str] = &["NOVEL", "LIGHT_NOVEL"];

/// `LIGHT_NOVEL` is classified but never sent upstream, which rejects
/// enumerants it does not define.
const NOVEL_QUERY_FORMATS: &[&str] = &["NOVEL"];

/// Classify an upstream format enumerant. Total: unknown and absent formats
/// are manga-like.
pub fn classify(format: Option<&str>) -> FormatClass {
    match format {
        Some(f) if NOVEL_FORMATS.contains(&f) => FormatClass::NovelLike,
        _ => FormatClass::MangaLike,
    }
}

/// The enumerant to send upstream for a format the caller asked for.
/// Classified-only formats collapse onto the query set of their class.
pub fn query_format(format: &str) -> &str {
    match classify(Some(format)) {
        FormatClass::NovelLike if !NOVEL_QUERY_FORMATS.contains(&format) => NOVEL_QUERY_FORMATS[0],
        _ => format,
    }
}

impl FormatClass {
    pub fn kind(&self) -> MediaKind {
        match self {
            FormatClass::MangaLike => MediaKind::Manga,
            FormatClass::NovelLike => MediaKind::Novel,
        }
    }

    pub fn of_kind(kind: MediaKind) -> Option<Self> {
        match kind {
            MediaKind::Manga => Some(FormatClass::MangaLike),
            MediaKind::Novel => Some(FormatClass::NovelLike),
            MediaKind::Anime => None,
        }
    }

    /// Upstream format enumerants that select novels in a query filter.
    pub const fn novel_filter() -> &'static [&'static str] {
        NOVEL_QUERY_FORMATS
    }
}
