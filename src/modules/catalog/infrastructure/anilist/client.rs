//! HTTP transport for the AniList GraphQL endpoint.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::time::Instant;

use crate::{
    modules::catalog::domain::QueryExecutor,
    shared::{
        config::CatalogConfig,
        errors::{AppError, AppResult, UpstreamError},
    },
};

use super::models::GraphQlEnvelope;

/// Longest body excerpt kept in a protocol error.
const MAX_DETAIL_LEN: usize = 512;

/// Executes GraphQL documents against one configured endpoint.
///
/// One instance per endpoint; the rate limiter is shared by every caller of
/// that instance. No retries.
pub struct HttpQueryExecutor {
    client: Client,
    endpoint: String,
    rate_limiter: Option<DefaultDirectRateLimiter>,
}

impl HttpQueryExecutor {
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = NonZeroU32::new(config.requests_per_minute)
            .map(|per_minute| RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            rate_limiter,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, document: &str, variables: Value) -> Result<Value, UpstreamError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let body = json!({
            "query": document,
            "variables": variables,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::transport(e.to_string()))?;

        classify_response(status, &text)
    }
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn execute(&self, document: &str, variables: Value, label: &str) -> AppResult<Value> {
        let started = Instant::now();
        let result = self.send(document, variables).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(label, elapsed_ms, "AniList query succeeded"),
            Err(err) => tracing::warn!(
                label,
                elapsed_ms,
                status = ?err.status,
                "AniList query failed: {}",
                err
            ),
        }

        result.map_err(AppError::from)
    }
}

/// Turn an HTTP status and body into the GraphQL `data` object or a typed
/// upstream failure.
pub fn classify_response(status: u16, body: &str) -> Result<Value, UpstreamError> {
    let success = (200..300).contains(&status);

    let envelope = match serde_json::from_str::<GraphQlEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(_) if success => {
            return Err(UpstreamError::protocol(
                status,
                format!("Response is not a GraphQL envelope: {}", excerpt(body)),
            ))
        }
        Err(_) => return Err(UpstreamError::protocol(status, excerpt(body))),
    };

    let errors = envelope.errors.unwrap_or_default();
    if !success {
        let detail = if errors.is_empty() {
            excerpt(body)
        } else {
            join_messages(&errors)
        };
        return Err(UpstreamError::protocol(status, detail));
    }

    if let Some(first) = errors.first() {
        return Err(UpstreamError::query(first.status, join_messages(&errors)));
    }

    match envelope.data {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(UpstreamError::protocol(
            status,
            "Response contained no data".to_string(),
        )),
    }
}

fn join_messages(errors: &[super::models::GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_DETAIL_LEN) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
