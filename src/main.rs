//! coincache - Look up coin market data from CoinGecko
//!
//! Fetches the market list once, then prints each requested coin from the
//! cached snapshot.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use coincache::cli::{format_entry, Cli, StartupConfig};
use coincache::logging::init_logging;
use coincache::CachedCatalogFetcher;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(config.verbose);

    let fetcher = match CachedCatalogFetcher::from_config(&config.fetcher) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let results = match fetcher.lookup_many(config.ids.as_slice()).await {
        Ok(results) => results,
        Err(e) => {
            error!(error = %e, "could not fetch market list");
            eprintln!("Error fetching coins: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    let mut printed = 0;
    for result in results {
        match result.map_err(|e| e.to_string()).and_then(|entry| {
            format_entry(&entry, config.output).map_err(|e| e.to_string())
        }) {
            Ok(text) => {
                // Blank line between coins, none after the last
                if printed > 0 {
                    println!();
                }
                println!("{}", text);
                printed += 1;
            }
            Err(e) => {
                eprintln!("Error getting coin: {}", e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
