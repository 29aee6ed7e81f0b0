// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::Result;
use crate::models::SourceConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &SourceConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Retry settings for idempotent GETs.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// GET `url` with `query`, retrying transient failures.
///
/// Non-success statuses are turned into errors once retries are exhausted.
pub async fn get_with_retry(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
    policy: RetryPolicy,
) -> Result<Response> {
    let mut attempt = 0;
    loop {
        let result = client
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(Response::error_for_status);

        match result {
            Ok(response) => return Ok(response),
            Err(error) if attempt < policy.max_retries && is_transient(&error) => {
                attempt += 1;
                log::warn!(
                    "GET {} failed ({}), retry {}/{}",
                    url,
                    error,
                    attempt,
                    policy.max_retries
                );
                tokio::time::sleep(policy.backoff * attempt).await;
            }
            Err(error) => return Err(error.into()),
        }
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() {
        return true;
    }
    matches!(
        error.status(),
        Some(
            StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    )
}
