pub mod modules;
pub mod schema;
pub mod shared;

use std::sync::Arc;

use modules::{
    catalog::{HttpQueryExecutor, QueryExecutor},
    media::{MediaRepository, MediaRepositoryImpl, MediaSyncService},
};
use shared::{errors::AppResult, AppConfig, Database};

pub use modules::media::{MediaKind, MediaOverview, MediaResponse, SearchCriteria};
pub use shared::{
    application::{Page, PageInfo, Paging},
    errors::{AppError, UpstreamError, UpstreamErrorKind},
};

/// Wire the Postgres store and the AniList transport into a sync service.
///
/// Blocks while the pool connects and pending migrations run, so call it
/// before serving traffic (or from `spawn_blocking`).
pub fn bootstrap(config: &AppConfig) -> AppResult<MediaSyncService> {
    shared::utils::init_logger();

    let database = Arc::new(Database::new(&config.database)?);
    database.run_migrations()?;

    let repository: Arc<dyn MediaRepository> = Arc::new(MediaRepositoryImpl::new(database));
    let executor: Arc<dyn QueryExecutor> = Arc::new(HttpQueryExecutor::new(&config.catalog)?);

    log_info!(
        "Media sync ready (endpoint: {}, staleness window: {}s)",
        config.catalog.endpoint,
        config.sync.staleness_window.as_secs()
    );

    Ok(MediaSyncService::new(repository, executor, config.sync.clone()))
}
