//! Environment-driven configuration.
//!
//! Values are read once at startup (after loading `.env` through dotenvy) and
//! handed to the components that need them; nothing reads the environment
//! after construction.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::application::MAX_PER_PAGE;
use crate::shared::errors::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";
const DEFAULT_USER_AGENT: &str = "kansho/0.1 (media-tracker metadata sync)";
const MAX_OVERVIEW_PAGE_SIZE: u32 = 25;

/// Upstream catalog connection settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub endpoint: String,
    /// Fixed transport timeout; not configurable per call.
    pub timeout: Duration,
    /// 0 disables client-side rate limiting.
    pub requests_per_minute: u32,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            // AniList allows 90 req/min in normal operation
            requests_per_minute: 90,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Read-through behaviour of the synchronization service.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Records synced within this window are served from the local store.
    /// Zero means every single-record read refreshes from upstream.
    pub staleness_window: Duration,
    /// Upper bound on ids sent in one upstream batch.
    pub batch_limit: usize,
    /// Page size for the character/staff/recommendation previews of an overview.
    pub overview_page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            staleness_window: Duration::ZERO,
            batch_limit: MAX_PER_PAGE as usize,
            overview_page_size: 6,
        }
    }
}

impl SyncConfig {
    pub fn with_staleness_window(mut self, window: Duration) -> Self {
        self.staleness_window = window;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size override; `None` sizes the pool from the CPU count.
    pub max_pool_size: Option<u32>,
}

impl DatabaseConfig {
    /// Validate and retrieve database URL
    pub fn new(url: String) -> AppResult<Self> {
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(AppError::ValidationError(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }
        Ok(Self {
            url,
            max_pool_size: None,
        })
    }

    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    /// Host part of the URL, for logging without credentials.
    pub fn redacted(&self) -> &str {
        self.url.rsplit('@').next().unwrap_or("unknown_host")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub sync: SyncConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| {
            AppError::ValidationError("DATABASE_URL environment variable not found".to_string())
        })?;

        let defaults = CatalogConfig::default();
        let catalog = CatalogConfig {
            endpoint: env::var("CATALOG_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout: Duration::from_secs(env_number("CATALOG_TIMEOUT_SECS", 30u64)?),
            requests_per_minute: env_number(
                "CATALOG_REQUESTS_PER_MINUTE",
                defaults.requests_per_minute,
            )?,
            user_agent: defaults.user_agent,
        };

        let sync = SyncConfig {
            staleness_window: Duration::from_secs(env_number("CATALOG_STALENESS_SECS", 0u64)?),
            overview_page_size: env_number("CATALOG_OVERVIEW_PAGE_SIZE", 6u32)?
                .clamp(1, MAX_OVERVIEW_PAGE_SIZE),
            ..SyncConfig::default()
        };

        let mut database = DatabaseConfig::new(database_url)?;
        let pool_size = env_number("DATABASE_POOL_SIZE", 0u32)?;
        if pool_size > 0 {
            database = database.with_pool_size(pool_size);
        }

        Ok(Self {
            catalog,
            sync,
            database,
        })
    }
}

fn env_number<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|_| {
            AppError::ValidationError(format!("{} must be a non-negative integer, got '{}'", key, raw))
        }),
        _ => Ok(default),
    }
}
