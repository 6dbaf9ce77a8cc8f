//! Core data models for the coin catalog
//!
//! This module contains the market record returned by the CoinGecko
//! `/coins/markets` endpoint and the immutable snapshot the cache publishes.

pub mod coingecko;

pub use coingecko::{CatalogSource, CoinGeckoClient};

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Return on investment since the coin's launch price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    /// Price multiple relative to launch
    pub times: f64,
    /// Currency the multiple is quoted in
    pub currency: String,
    /// Same figure as a percentage
    pub percentage: f64,
}

/// One coin's market record at a point in time
///
/// Field names match the CoinGecko wire format. The API emits `null` for
/// figures it does not know (max supply, ROI, rank for new listings), so
/// everything beyond the identity fields is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identifier (e.g. "bitcoin")
    pub id: String,
    /// Ticker symbol (e.g. "btc")
    pub symbol: String,
    /// Human-readable name
    pub name: String,
    /// Logo URL
    #[serde(default)]
    pub image: Option<String>,
    /// Price in the requested currency
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub fully_diluted_valuation: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    /// All-time high price
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub ath_change_percentage: Option<f64>,
    #[serde(default)]
    pub ath_date: Option<DateTime<Utc>>,
    /// All-time low price
    #[serde(default)]
    pub atl: Option<f64>,
    #[serde(default)]
    pub atl_change_percentage: Option<f64>,
    #[serde(default)]
    pub atl_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub roi: Option<Roi>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    /// Creates an entry with only the identity fields and a price set
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price,
            market_cap: None,
            market_cap_rank: None,
            fully_diluted_valuation: None,
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_24h: None,
            price_change_percentage_24h: None,
            market_cap_change_24h: None,
            market_cap_change_percentage_24h: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            ath: None,
            ath_change_percentage: None,
            ath_date: None,
            atl: None,
            atl_change_percentage: None,
            atl_date: None,
            roi: None,
            last_updated: None,
        }
    }
}

/// Checks that every identifier is non-empty and unique
///
/// A single bad entry rejects the whole payload; there is no partial snapshot.
pub fn validate_entries(entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if entry.id.trim().is_empty() {
            return Err(CatalogError::InvalidSnapshot(format!(
                "entry {} has an empty id",
                index
            )));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(CatalogError::InvalidSnapshot(format!(
                "duplicate id '{}'",
                entry.id
            )));
        }
    }
    Ok(())
}

/// Immutable, point-in-time copy of the full catalog list
///
/// Built once per successful fetch and shared behind an `Arc`; a refresh
/// publishes a new snapshot rather than editing this one.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    entries: Vec<CatalogEntry>,
    fetched_at: DateTime<Utc>,
    retrieved: Instant,
}

impl CatalogSnapshot {
    /// Wraps a freshly fetched entry list, stamping it with the current time
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            fetched_at: Utc::now(),
            retrieved: Instant::now(),
        }
    }

    /// Entries in the order the source returned them
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear scan for an identifier
    pub fn find(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Wall-clock time the snapshot was retrieved
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Time elapsed since retrieval (monotonic)
    pub fn age(&self) -> Duration {
        self.retrieved.elapsed()
    }

    /// Whether the snapshot is younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}
