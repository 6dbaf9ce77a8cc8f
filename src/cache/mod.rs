//! In-memory catalog cache
//!
//! This module provides a read-through cache over a `CatalogSource` with a
//! configurable TTL (time-to-live). A failed refresh leaves the previous
//! snapshot in place, so stale data stays readable while the API is down.

mod fetcher;

pub use fetcher::{CacheState, CachedCatalogFetcher};
