//! Cached catalog records for anime, manga and light novels.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{MediaOverview, MediaResponse, MediaSyncService, SearchCriteria};
pub use domain::{MediaKind, MediaRecord, MediaRepository, MediaStatus};
pub use infrastructure::{InMemoryMediaRepository, MediaRepositoryImpl};
