use async_trait::async_trait;
use serde_json::Value;

use crate::shared::errors::AppResult;

/// Executes one query document against the upstream catalog.
///
/// Returns the `data` object of the response. Every failure is an
/// `AppError::Upstream`; implementations never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, document: &str, variables: Value, label: &str) -> AppResult<Value>;
}
