pub mod format_class;
pub mod media_kind;
pub mod media_status;

pub use format_class::{classify, query_format, FormatClass};
pub use media_kind::{KindGroup, MediaKind};
pub use media_status::MediaStatus;
