//! Log output setup
//!
//! Logs go to stderr so they never mix with lookup output on stdout.
//! `RUST_LOG` overrides the default filter (e.g. `RUST_LOG=coincache=debug`).

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from `RUST_LOG`, falling back to `default`
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber
///
/// `verbose` raises the crate's own default level to `debug`. Calling this
/// twice is harmless; the second install is ignored.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,coincache=debug"
    } else {
        DEFAULT_FILTER
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }

    #[test]
    fn test_env_filter_builds_from_default() {
        let filter = env_filter("info");
        assert!(!filter.to_string().is_empty());
    }
}
