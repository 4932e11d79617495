pub mod entities;
pub mod repositories;
pub mod value_objects;

// Re-exports for easy access
pub use entities::{KindExtension, MediaRecord, NewMediaRecord};
pub use repositories::MediaRepository;
pub use value_objects::{classify, FormatClass, KindGroup, MediaKind, MediaStatus};
