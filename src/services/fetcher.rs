// src/services/fetcher.rs

//! Page retrieval.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::ClientConfig;
use crate::utils::http;

/// Retrieves the markup of a page.
///
/// Every call performs a fresh retrieval; nothing is cached.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `PageFetcher` backed by a reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a client built from the configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(http::create_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {url}");
        http::fetch_markup(&self.client, url).await
    }
}


#[cfg(test)]
mod tests {
    use super::fixture::MapFetcher;
    use super::*;

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_map_fetcher_is_not_cached() {
        let fetcher = MapFetcher::default().page("https://a.test/", "<p>a</p>");

        assert_eq!(fetcher.fetch("https://a.test/").await.unwrap(), "<p>a</p>");
        assert_eq!(fetcher.fetch("https://a.test/").await.unwrap(), "<p>a</p>");
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_map_fetcher_failure() {
        let fetcher = MapFetcher::default().failing("https://down.test/");
        assert!(fetcher.fetch("https://down.test/").await.is_err());
        assert!(fetcher.fetch("https://unknown.test/").await.is_err());
    }
}
