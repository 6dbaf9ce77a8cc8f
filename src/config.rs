//! Fetcher configuration
//!
//! Holds the source URL, query parameters and timing knobs. The defaults
//! reproduce the fixed CoinGecko query: USD prices, ordered by market cap,
//! first page of 250 coins, refreshed every ten minutes.

use std::time::Duration;

/// Base URL for the CoinGecko markets endpoint
pub const COINGECKO_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

/// How long a snapshot is trusted before it is refetched
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound for a single fetch
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page the markets endpoint will serve
pub const MAX_PER_PAGE: u16 = 250;

/// Configuration for a `CachedCatalogFetcher` backed by CoinGecko
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Markets endpoint, without query string
    pub base_url: String,
    /// Quote currency for prices (e.g. "usd")
    pub vs_currency: String,
    /// Number of coins to request (1..=250)
    pub per_page: u16,
    /// Snapshot time-to-live
    pub ttl: Duration,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_MARKETS_URL.to_string(),
            vs_currency: "usd".to_string(),
            per_page: MAX_PER_PAGE,
            ttl: DEFAULT_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl FetcherConfig {
    /// Full request URL including the query string
    pub fn markets_url(&self) -> String {
        format!(
            "{}?vs_currency={}&order=market_cap_desc&per_page={}&page=1",
            self.base_url, self.vs_currency, self.per_page
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.per_page, 250);
        assert_eq!(config.vs_currency, "usd");
    }

    #[test]
    fn test_default_markets_url() {
        let config = FetcherConfig::default();
        assert_eq!(
            config.markets_url(),
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=250&page=1"
        );
    }

    #[test]
    fn test_custom_markets_url() {
        let config = FetcherConfig {
            base_url: "http://127.0.0.1:9000/markets".to_string(),
            vs_currency: "eur".to_string(),
            per_page: 10,
            ..Default::default()
        };
        assert_eq!(
            config.markets_url(),
            "http://127.0.0.1:9000/markets?vs_currency=eur&order=market_cap_desc&per_page=10&page=1"
        );
    }
}
