//! Error types for fetching and querying the coin catalog

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when refreshing the catalog or looking up a coin
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP request could not complete (connection, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream API answered with a non-success status
    #[error("Received non-OK response: {status}")]
    UpstreamStatus {
        /// Status code returned by the API
        status: StatusCode,
        /// Response body, truncated, for diagnostics
        body: String,
    },

    /// The payload is not a JSON array of market entries
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload parsed but breaks the catalog invariants
    #[error("Invalid catalog payload: {0}")]
    InvalidSnapshot(String),

    /// No entry with this identifier in a fresh snapshot
    #[error("Coin with ID {0} not found")]
    NotFound(String),

    /// Lookups need a non-empty identifier
    #[error("Coin ID must not be empty")]
    EmptyId,
}

impl CatalogError {
    /// True for both kinds of payload decoding failure
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::InvalidSnapshot(_))
    }

    /// True when the identifier was absent from the snapshot
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_id() {
        let err = CatalogError::NotFound("dogecoin".to_string());
        assert_eq!(err.to_string(), "Coin with ID dogecoin not found");
        assert!(err.is_not_found());
        assert!(!err.is_decode());
    }

    #[test]
    fn test_upstream_status_message() {
        let err = CatalogError::UpstreamStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_decode_family() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(CatalogError::from(json_err).is_decode());
        assert!(CatalogError::InvalidSnapshot("dup".into()).is_decode());
        assert!(!CatalogError::EmptyId.is_decode());
    }
}
