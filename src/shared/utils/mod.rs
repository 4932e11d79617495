pub mod logger;
pub mod validation;

pub use logger::{init_logger, CacheDecision, LogContext, TimedOperation};
pub use validation::Validator;
