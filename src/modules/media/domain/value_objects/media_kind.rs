use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Logical media kind of a stored record. Assigned once, never changed.
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::MediaKind"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Anime,
    Manga,
    Novel,
}

/// Kinds that share one upstream media type and one field mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindGroup {
    Anime,
    /// Manga and novels: upstream type `MANGA`, split by format.
    Print,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Anime, MediaKind::Manga, MediaKind::Novel];

    pub fn group(&self) -> KindGroup {
        match self {
            MediaKind::Anime => KindGroup::Anime,
            MediaKind::Manga | MediaKind::Novel => KindGroup::Print,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Anime => "ANIME",
            MediaKind::Manga => "MANGA",
            MediaKind::Novel => "NOVEL",
        }
    }
}

impl KindGroup {
    /// Upstream `MediaType` enumerant for this group.
    pub fn upstream_type(&self) -> &'static str {
        match self {
            KindGroup::Anime => "ANIME",
            KindGroup::Print => "MANGA",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ANIME" => Ok(MediaKind::Anime),
            "MANGA" => Ok(MediaKind::Manga),
            "NOVEL" => Ok(MediaKind::Novel),
            other => Err(AppError::ValidationError(format!(
                "Unknown media kind '{}'",
                other
            ))),
        }
    }
}
