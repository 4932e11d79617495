// Shared kernel used by every bounded context

pub mod application; // Pagination
pub mod config; // Environment-driven settings
pub mod database; // Connection pool + embedded migrations
pub mod errors; // Crate-wide error taxonomy
pub mod utils; // Logging and validation helpers

// Re-exports for convenience
pub use config::{AppConfig, CatalogConfig, DatabaseConfig, SyncConfig};
pub use database::Database;
