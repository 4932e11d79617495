//! Upstream catalog access: the query executor seam and its AniList transport.

pub mod domain;
pub mod infrastructure;

pub use domain::QueryExecutor;
pub use infrastructure::HttpQueryExecutor;
