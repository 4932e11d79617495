pub mod media_record;

pub use media_record::{KindExtension, MediaRecord, NewMediaRecord};
