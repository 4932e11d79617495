/// Pagination support for queries
///
/// One paging model is shared by upstream page queries and local listings.
use serde::{Deserialize, Serialize};

/// Upstream rejects pages larger than this.
pub const MAX_PER_PAGE: u32 = 50;

/// Pagination parameters: 1-based page, page size capped at [`MAX_PER_PAGE`].
///
/// Deserialized input goes through [`Paging::new`], so the bounds hold for
/// every value regardless of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPaging")]
pub struct Paging {
    page: u32,
    per_page: u32,
}

/// Unchecked wire shape of [`Paging`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPaging {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl From<RawPaging> for Paging {
    fn from(raw: RawPaging) -> Self {
        Paging::new(raw.page, raw.per_page)
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Paging {
    /// Out-of-range values are clamped rather than rejected.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Calculate offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Get limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: i64,
    pub current_page: u32,
    pub last_page: u32,
    pub has_next_page: bool,
}

impl PageInfo {
    /// Derive page info from a total row count, for local listings.
    pub fn from_total(total: i64, paging: &Paging) -> Self {
        let per_page = paging.per_page().max(1) as i64;
        let last_page = ((total.max(0) + per_page - 1) / per_page).max(1) as u32;

        Self {
            total: total.max(0),
            current_page: paging.page(),
            last_page,
            has_next_page: paging.page() < last_page,
        }
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page_info: PageInfo,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(page_info: PageInfo, items: Vec<T>) -> Self {
        Self { page_info, items }
    }
}
