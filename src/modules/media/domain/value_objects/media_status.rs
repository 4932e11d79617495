use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::MediaStatus"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
}

impl MediaStatus {
    /// Map an upstream status enumerant.
    ///
    /// Only the four stored statuses pass through, matched exactly; anything
    /// else (including `HIATUS`, padded, empty and absent) becomes
    /// `NotYetReleased`. Callers rely on this fallback.
    pub fn from_upstream(raw: Option<&str>) -> Self {
        match raw {
            Some("FINISHED") => MediaStatus::Finished,
            Some("RELEASING") => MediaStatus::Releasing,
            Some("NOT_YET_RELEASED") => MediaStatus::NotYetReleased,
            Some("CANCELLED") => MediaStatus::Cancelled,
            _ => MediaStatus::NotYetReleased,
        }
    }

    pub fn as_upstream(&self) -> &'static str {
        match self {
            MediaStatus::Finished => "FINISHED",
            MediaStatus::Releasing => "RELEASING",
            MediaStatus::NotYetReleased => "NOT_YET_RELEASED",
            MediaStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_upstream())
    }
}
