pub mod dto;
pub mod field_adapter;
pub mod kind_descriptor;
pub mod sync_service;

pub use dto::{MediaOverview, MediaResponse, SearchCriteria};
pub use field_adapter::MediaFieldAdapter;
pub use kind_descriptor::KindDescriptor;
pub use sync_service::MediaSyncService;
