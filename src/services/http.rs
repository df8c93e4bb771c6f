//! Thin HTTP wrapper shared by the registry and quote fetchers.
//!
//! One retry policy lives here: up to [`MAX_RETRIES`] attempts with
//! linear backoff (base delay times the attempt number), retrying on
//! transport errors and 5xx responses only. Client errors fail fast.

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::constants::{MAX_RETRIES, REQUEST_TIMEOUT_SECS, RETRY_BASE_DELAY_SECS};
use crate::error::{Error, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET a URL and return the body as text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get_with_retry(url).await?;
        Ok(response.text().await?)
    }

    /// GET a URL and return the body parsed as JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.get_with_retry(url).await?;
        Ok(response.json().await?)
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut last_error = String::new();

        for attempt in 1..=MAX_RETRIES {
            if attempt > 1 {
                let delay = Duration::from_secs(RETRY_BASE_DELAY_SECS * attempt as u64);
                warn!(url, attempt, delay_secs = delay.as_secs(), reason = %last_error, "Retrying request");
                sleep(delay).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status.is_server_error() {
                        last_error = format!("server error {}", status.as_u16());
                        continue;
                    }
                    return Err(Error::Network(format!(
                        "{} returned non-retryable status {}",
                        url,
                        status.as_u16()
                    )));
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }
        }

        Err(Error::Network(format!(
            "{} failed after {} attempts: {}",
            url, MAX_RETRIES, last_error
        )))
    }
}
