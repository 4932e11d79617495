use crate::log_info;
use crate::shared::config::DatabaseConfig;
use crate::shared::errors::AppError;
use crate::shared::utils::logger::LogContext;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::{Duration, Instant};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Acquiring a pooled connection slower than this is reported.
const SLOW_ACQUIRE_MS: u64 = 100;

/// Owns the r2d2 pool behind every diesel repository.
#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
        let sizing = PoolSizing::resolve(config.max_pool_size, available_cpus());

        let pool = r2d2::Pool::builder()
            .max_size(sizing.max_size)
            .min_idle(Some(sizing.min_idle))
            .connection_timeout(Duration::from_secs(10))
            .idle_timeout(Some(Duration::from_secs(300)))
            .max_lifetime(Some(Duration::from_secs(1800)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create connection pool: {}", e))
            })?;

        log_info!(
            "Media store pool ready for {} (max_size: {}, min_idle: {})",
            config.redacted(),
            sizing.max_size,
            sizing.min_idle
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool, e.g. one pointing at an isolated test database.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn get_connection(&self) -> Result<DbConnection, AppError> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let waited = start.elapsed().as_millis() as u64;
                if waited > SLOW_ACQUIRE_MS {
                    LogContext::performance_metric("db_connection_acquire", waited, "slow");
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::error_with_context(&e, "Failed to acquire media store connection");
                Err(AppError::from(e))
            }
        }
    }

    /// Apply embedded migrations; safe to call on every startup.
    pub fn run_migrations(&self) -> Result<(), AppError> {
        let mut conn = self.get_connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;

        log_info!("Media store migrations completed ({} applied)", applied.len());
        Ok(())
    }
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PoolSizing {
    max_size: u32,
    min_idle: u32,
}

impl PoolSizing {
    /// Explicit size wins; otherwise two connections per CPU, capped at 20.
    fn resolve(configured: Option<u32>, cpus: usize) -> Self {
        let max_size = configured
            .filter(|size| *size > 0)
            .unwrap_or_else(|| (cpus * 2).min(20) as u32);
        let min_idle = (max_size / 4).max(2).min(max_size);

        Self { max_size, min_idle }
    }
}
