//! Retrieval of upstream feed text
//!
//! The rest of the application only sees the [`TextSource`] trait: give it a
//! URL, get the body back as a string. [`FeedClient`] implements it over HTTP
//! and [`StaticSource`] serves fixed text from memory.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: single-shot rate-limited requests
//! - `catalog`: where each dataset lives upstream

use std::collections::HashMap;

use async_trait::async_trait;
use url::Url;

use crate::errors::{FetchError, FetchResult, Result};

pub mod catalog;
pub mod config;
pub mod http;

pub use catalog::FeedCatalog;
pub use config::ClientConfig;

use http::HttpHandler;

/// Anything that can produce the text behind a URL
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Fetch the full body of `url`
    async fn fetch_text(&self, url: &Url) -> FetchResult<String>;
}

/// HTTP client for the upstream feeds
#[derive(Debug)]
pub struct FeedClient {
    http_handler: HttpHandler,
}

impl FeedClient {
    /// Creates a client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the rate limit
    /// is zero
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = config.build_http_client()?;
        let http_handler =
            HttpHandler::new(client, config.rate_limit_rps, config.request_timeout)?;

        tracing::debug!(
            "Created feed client (timeout {:?}, {} req/s)",
            config.request_timeout,
            config.rate_limit_rps
        );

        Ok(Self { http_handler })
    }
}

#[async_trait]
impl TextSource for FeedClient {
    async fn fetch_text(&self, url: &Url) -> FetchResult<String> {
        self.http_handler.get_text(url).await
    }
}

/// In-memory text source keyed by URL
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    texts: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the text returned for `url`
    pub fn insert(&mut self, url: &Url, text: impl Into<String>) {
        self.texts.insert(url.to_string(), text.into());
    }

    /// Builder-style [`StaticSource::insert`]
    pub fn with(mut self, url: &Url, text: impl Into<String>) -> Self {
        self.insert(url, text);
        self
    }
}

#[async_trait]
impl TextSource for StaticSource {
    async fn fetch_text(&self, url: &Url) -> FetchResult<String> {
        self.texts
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_client_creation() {
        assert!(FeedClient::new().is_ok());
    }

    #[test]
    fn test_feed_client_rejects_zero_rate() {
        let config = ClientConfig {
            rate_limit_rps: 0,
            ..Default::default()
        };
        assert!(FeedClient::with_config(config).is_err());
    }

    #[tokio::test]
    async fn test_static_source_serves_registered_text() {
        let url = Url::parse("https://example.com/vax.csv").unwrap();
        let other = Url::parse("https://example.com/other.csv").unwrap();
        let source = StaticSource::new().with(&url, "date,total\n");

        assert_eq!(source.fetch_text(&url).await.unwrap(), "date,total\n");
        assert!(matches!(
            source.fetch_text(&other).await,
            Err(FetchError::NotFound { .. })
        ));
    }
}
