//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with a proper user agent string and timeouts
//! - GET requests returning the decoded page body (see [`super::decode`])
//! - Error classification (timeout, transport failure, HTTP status)

use crate::config::Config;
use crate::crawler::decode::decode_body;
use crate::{ConfigError, ScrapeError};
use encoding_rs::Encoding;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use volby_scraper::config::Config;
/// use volby_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.scraper.timeout_secs))
        .connect_timeout(Duration::from_secs(config.scraper.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs page downloads for the scraper
///
/// Every call to [`Fetcher::fetch`] is exactly one network round trip;
/// nothing is cached and nothing is retried.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    fallback_encoding: &'static Encoding,
}

impl Fetcher {
    /// Creates a fetcher with a client built from `config`
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let label = &config.scraper.fallback_encoding;
        let fallback_encoding = config.scraper.resolve_fallback_encoding().ok_or_else(|| {
            ConfigError::Validation(format!("unknown fallback_encoding '{}'", label))
        })?;

        let client = build_http_client(config)?;
        Ok(Self::with_client(client, fallback_encoding))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, fallback_encoding: &'static Encoding) -> Self {
        Self {
            client,
            fallback_encoding,
        }
    }

    /// Fetches a page and returns its body as text
    ///
    /// The body is decoded using the charset declared in the `Content-Type`
    /// header, then a `<meta>` charset declaration, then the configured
    /// fallback encoding.
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request timed out | `ScrapeError::Timeout` |
    /// | Non-2xx status | `ScrapeError::HttpStatus` |
    /// | Any other transport failure | `ScrapeError::Http` |
    pub async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
        let body = decode_body(&bytes, content_type.as_deref(), self.fallback_encoding);

        tracing::trace!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

/// Maps a reqwest error to the matching scrape error
fn classify_error(url: &Url, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
