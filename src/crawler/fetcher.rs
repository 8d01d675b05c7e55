//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client from configuration
//! - Single GET requests returning the page body as text
//! - Error classification
//!
//! There is no retry logic. A failed request is reported once and the caller
//! decides what it means.

use crate::config::HttpConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Reasons a page body could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Classifies a reqwest error raised while sending a request
    fn from_send(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_builder() {
            Self::InvalidUrl {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Builds an HTTP client with the configured timeouts and TLS policy
///
/// # Example
///
/// ```no_run
/// use email_census::config::HttpConfig;
/// use email_census::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled");
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET and returns its body as text
///
/// The body is returned whatever the response status: error pages are still
/// pages, and their text is scanned like any other.
///
/// # Error Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | URL does not parse | `InvalidUrl` |
/// | Timeout | `Timeout` |
/// | DNS failure, connection refused, TLS error | `Connect` |
/// | Body cannot be read or decoded | `Body` |
/// | Anything else | `Request` |
pub async fn fetch_body(client: &Client, url: &str) -> Result<String, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| FetchError::from_send(url, e))?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} answered with status {}, reading body anyway", url, status);
    }

    response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Body(e.to_string())
        }
    })
}
