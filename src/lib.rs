//! coincache library
//!
//! A cached client for the CoinGecko `/coins/markets` list. The list is kept
//! in memory for a configurable TTL and coins are looked up by identifier.
//! This module also exposes the CLI parsing for use in integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;

pub use cache::{CacheState, CachedCatalogFetcher};
pub use config::FetcherConfig;
pub use data::{CatalogEntry, CatalogSnapshot, CatalogSource, CoinGeckoClient, Roi};
pub use error::CatalogError;
