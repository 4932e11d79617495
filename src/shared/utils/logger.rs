use log::{debug, error, info, warn};
use std::fmt::Display;
use std::sync::Once;

static INIT: Once = Once::new();

/// Repository calls slower than this are logged at warn.
const SLOW_OPERATION_MS: u64 = 250;

/// Initialize `env_logger` once. `RUST_LOG` still overrides the defaults.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .filter_module("kansho_lib", log::LevelFilter::Debug)
            .filter_module("diesel", log::LevelFilter::Warn)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("hyper", log::LevelFilter::Warn)
            .filter_module("tokio", log::LevelFilter::Warn)
            .parse_default_env()
            .format_timestamp_millis()
            .format_module_path(false)
            .try_init();

        info!("Logging initialized");
    });
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// How a single-record read was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    Fresh,
    Stale,
    Miss,
}

/// Structured log lines shared by the sync service and the repositories.
pub struct LogContext;

impl LogContext {
    pub fn db_operation(operation: &str, duration_ms: u64) {
        if duration_ms >= SLOW_OPERATION_MS {
            warn!("DB: {} on media took {}ms (slow)", operation, duration_ms);
        } else {
            debug!("DB: {} on media completed in {}ms", operation, duration_ms);
        }
    }

    pub fn cache_decision(kind: impl Display, external_id: i32, decision: CacheDecision) {
        match decision {
            CacheDecision::Fresh => debug!("Cache: {} {} served locally", kind, external_id),
            CacheDecision::Stale => debug!("Cache: {} {} stale, refreshing", kind, external_id),
            CacheDecision::Miss => debug!("Cache: {} {} not stored, fetching", kind, external_id),
        }
    }

    pub fn search_operation(kind: impl Display, text: &str, results: Option<usize>) {
        match results {
            Some(count) => info!("Search: {} '{}' returned {} results", kind, text, count),
            None => debug!("Search: {} '{}' starting", kind, text),
        }
    }

    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    pub fn performance_metric(operation: &str, duration_ms: u64, note: &str) {
        info!("Performance: {} took {}ms ({})", operation, duration_ms, note);
    }
}

/// Times one repository call and reports it through [`LogContext::db_operation`].
pub struct TimedOperation {
    start: std::time::Instant,
    operation: &'static str,
}

impl TimedOperation {
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn finish(self) -> u64 {
        let duration = self.elapsed_ms();
        LogContext::db_operation(self.operation, duration);
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent() {
        init_logger();
        init_logger();
        log::debug!("logger ready");
    }

    #[test]
    fn test_timed_operation_reports_elapsed() {
        let timer = TimedOperation::new("find_by_kind");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.finish() >= 5);
    }
}
