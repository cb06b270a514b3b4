//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests to fetch page markup
//! - Fixed-delay retry for transient failures
//! - Error classification

use crate::config::ScraperConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Failure of a single fetch attempt, or of all of them
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("gave up on {url} after {attempts} attempt(s): {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true if another attempt could plausibly succeed
    ///
    /// Only malformed requests (which reqwest reports while building them)
    /// are considered permanent.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Invalid(_) | Self::Exhausted { .. })
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::Invalid(error.to_string())
        } else if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connection(error.to_string())
        } else if let Some(status) = error.status() {
            Self::Status(status.as_u16())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Markup retrieved for a URL
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; relative links resolve against this
    pub final_url: Url,

    /// Response body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// The configured timeout applies to each attempt separately.
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// GET with bounded, fixed-delay retry
///
/// Cloning is cheap; the underlying client shares its connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from crawl settings
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(
            client,
            config.retry_attempts,
            config.retry_delay(),
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, retry_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            retry_attempts: retry_attempts.max(1),
            retry_delay,
        }
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Non-2xx status | Retry after the fixed delay |
    /// | Timeout | Retry after the fixed delay |
    /// | Connection error | Retry after the fixed delay |
    /// | Body read error | Retry after the fixed delay |
    /// | Final attempt fails | `FetchError::Exhausted`, no delay |
    ///
    /// The fetcher never records failures itself; the caller owns crawl state.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.fetch_once(url).await {
                Ok(page) => {
                    if attempt > 1 {
                        tracing::debug!("Fetched {} on attempt {}", url, attempt);
                    }
                    return Ok(page);
                }
                Err(e) => e,
            };

            if attempt >= self.retry_attempts || !error.is_retryable() {
                tracing::warn!(
                    "Failed to fetch {} after {} attempt(s): {}",
                    url,
                    attempt,
                    error
                );
                return Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last_error: Box::new(error),
                });
            }

            tracing::debug!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                self.retry_attempts,
                url,
                error,
                self.retry_delay
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// Performs exactly one GET
    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchedPage { final_url, body })
    }
}
