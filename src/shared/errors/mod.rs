pub mod app_error;
pub mod upstream_error;

pub use app_error::{AppError, AppResult};
pub use upstream_error::{UpstreamError, UpstreamErrorKind};
