//! CoinGecko markets API client
//!
//! This module fetches the coin market list from the CoinGecko
//! `/coins/markets` endpoint and decodes it into `CatalogEntry` values.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{validate_entries, CatalogEntry};
use crate::config::FetcherConfig;
use crate::error::CatalogError;

/// Longest response body kept in an `UpstreamStatus` error
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Anything that can produce a full catalog list
///
/// The cache only talks to this trait, so tests can swap the HTTP client
/// for an in-memory stub.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and decode the complete entry list
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
}

/// Client for fetching the market list from CoinGecko
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    url: String,
}

impl CoinGeckoClient {
    /// Create a new client for the given configuration
    ///
    /// The underlying HTTP client carries the configured request timeout.
    pub fn new(config: &FetcherConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("coincache/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a new client reusing an existing HTTP client
    pub fn with_client(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            url: config.markets_url(),
        }
    }

    /// The full request URL, query string included
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for CoinGeckoClient {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        debug!(url = %self.url, "requesting market list");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::UpstreamStatus {
                status,
                body: truncate_body(&body),
            });
        }

        let text = response.text().await?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&text)?;
        validate_entries(&entries)?;

        debug!(count = entries.len(), "decoded market list");
        Ok(entries)
    }
}

/// Keeps error bodies short enough to log
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
