//! Command-line interface parsing for coincache
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `FetcherConfig` plus the list of coins to look up.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::config::{FetcherConfig, COINGECKO_MARKETS_URL, MAX_PER_PAGE};
use crate::data::CatalogEntry;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The quote currency is not a plain lowercase code
    #[error("Invalid currency: '{0}'. Expected a code such as usd, eur or btc")]
    InvalidCurrency(String),

    /// The source URL is not an http(s) URL
    #[error("Invalid URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidUrl(String),
}

/// coincache - Look up coin market data through a cached CoinGecko client
#[derive(Parser, Debug)]
#[command(name = "coincache")]
#[command(about = "Cached CoinGecko market lookups")]
#[command(version)]
pub struct Cli {
    /// Coin identifiers to look up
    ///
    /// Examples:
    ///   coincache                    # Look up bitcoin
    ///   coincache ethereum solana    # Look up two coins from one fetch
    #[arg(value_name = "ID", default_value = "bitcoin")]
    pub ids: Vec<String>,

    /// Markets endpoint to query
    #[arg(long, value_name = "URL", default_value = COINGECKO_MARKETS_URL)]
    pub url: String,

    /// Currency prices are quoted in
    #[arg(long, value_name = "CODE", default_value = "usd")]
    pub vs_currency: String,

    /// Number of coins to fetch (1-250)
    #[arg(long, value_name = "N", default_value_t = MAX_PER_PAGE,
          value_parser = clap::value_parser!(u16).range(1..=250))]
    pub per_page: u16,

    /// Seconds a fetched list is reused before refetching
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub ttl_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Print each coin as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How lookup results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Name, symbol and price lines
    #[default]
    Summary,
    /// Pretty-printed JSON entry
    Json,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Fetcher settings
    pub fetcher: FetcherConfig,
    /// Coins to look up, in order
    pub ids: Vec<String>,
    /// Output format
    pub output: OutputFormat,
    /// Whether debug logging is on
    pub verbose: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the fetcher configured from the flags
    /// * `Err(CliError)` if the currency or URL is malformed
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let vs_currency = parse_currency_arg(&cli.vs_currency)?;

        let url = cli.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CliError::InvalidUrl(cli.url.clone()));
        }

        let fetcher = FetcherConfig {
            base_url: url.to_string(),
            vs_currency,
            per_page: cli.per_page,
            ttl: Duration::from_secs(cli.ttl_secs),
            request_timeout: Duration::from_secs(cli.timeout_secs),
        };

        Ok(StartupConfig {
            fetcher,
            ids: cli.ids.clone(),
            output: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Summary
            },
            verbose: cli.verbose,
        })
    }
}

/// Normalizes a currency argument to lowercase, rejecting anything that
/// is not ASCII alphanumeric.
pub fn parse_currency_arg(s: &str) -> Result<String, CliError> {
    let code = s.trim().to_lowercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CliError::InvalidCurrency(s.to_string()));
    }
    Ok(code)
}

/// Renders one entry for stdout
pub fn format_entry(entry: &CatalogEntry, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(entry),
        OutputFormat::Summary => {
            let price = entry
                .current_price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "n/a".to_string());
            Ok(format!(
                "Coin: {}\nSymbol: {}\nPrice: {}",
                entry.name, entry.symbol, price
            ))
        }
    }
}
