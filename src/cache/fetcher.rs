//! Read-through catalog cache with a time-to-live
//!
//! `CachedCatalogFetcher` owns the published snapshot and decides when to go
//! back to the source. Lookups against a fresh snapshot only take a read
//! lock. Refreshes are serialized by a separate mutex that is held across the
//! staleness re-check, the fetch and the publish, so any number of callers
//! that see a stale snapshot at once still cause a single fetch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::FetcherConfig;
use crate::data::{CatalogEntry, CatalogSnapshot, CatalogSource, CoinGeckoClient};
use crate::error::CatalogError;

/// Observable state of the cache
#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    /// Nothing has been fetched successfully yet
    Empty,
    /// A snapshot is published; it may be stale
    Populated {
        /// When the snapshot was retrieved
        fetched_at: DateTime<Utc>,
        /// Number of entries in the snapshot
        entries: usize,
        /// Whether the next call will refetch
        stale: bool,
    },
}

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<Arc<CatalogSnapshot>>,
    invalidated: bool,
    /// Bumped by every `invalidate`
    generation: u64,
}

/// Serves catalog entries from memory, refetching once the snapshot expires
///
/// A failed refresh never touches the published snapshot, so stale data stays
/// servable through `snapshot()` until a later fetch succeeds.
pub struct CachedCatalogFetcher<S = CoinGeckoClient> {
    source: S,
    ttl: Duration,
    slot: RwLock<Slot>,
    refresh_lock: Mutex<()>,
}

impl CachedCatalogFetcher<CoinGeckoClient> {
    /// Creates a fetcher backed by the CoinGecko client described by `config`
    pub fn from_config(config: &FetcherConfig) -> Result<Self, CatalogError> {
        let source = CoinGeckoClient::new(config)?;
        Ok(Self::new(source, config.ttl))
    }
}

impl<S: CatalogSource> CachedCatalogFetcher<S> {
    /// Creates an empty cache over `source`
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: RwLock::new(Slot::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Snapshot time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The data source this cache reads through to
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Makes sure a fresh snapshot is published and returns it
    ///
    /// # Returns
    /// * `Ok(snapshot)` - the cached snapshot if younger than the TTL,
    ///   otherwise a newly fetched one
    /// * `Err(CatalogError)` - the fetch failed; the previous snapshot, if
    ///   any, is left in place
    pub async fn ensure_fresh(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            debug!(age_ms = snapshot.age().as_millis() as u64, "catalog cache hit");
            return Ok(snapshot);
        }

        let _refresh = self.refresh_lock.lock().await;

        // Someone else may have refreshed while we waited for the lock
        if let Some(snapshot) = self.fresh_snapshot().await {
            debug!("catalog refreshed by another caller");
            return Ok(snapshot);
        }

        // An invalidate that lands while the fetch is in flight must survive it
        let generation = self.slot.read().await.generation;

        let started = Instant::now();
        let entries = match self.source.fetch_catalog().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "catalog refresh failed, keeping previous snapshot");
                return Err(err);
            }
        };

        let snapshot = Arc::new(CatalogSnapshot::new(entries));
        {
            let mut slot = self.slot.write().await;
            slot.snapshot = Some(Arc::clone(&snapshot));
            if slot.generation == generation {
                slot.invalidated = false;
            }
        }

        info!(
            entries = snapshot.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog refreshed"
        );
        Ok(snapshot)
    }

    /// Looks up a single coin by identifier
    ///
    /// Refreshes first if the snapshot is stale. The entry is cloned out of
    /// the snapshot, so later refreshes do not affect the returned value.
    pub async fn lookup_by_id(&self, id: &str) -> Result<CatalogEntry, CatalogError> {
        if id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        let snapshot = self.ensure_fresh().await?;
        snapshot
            .find(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Looks up several coins against a single freshness check
    ///
    /// The outer error is a failed refresh; inner results are per identifier,
    /// in input order. Like `lookup_by_id`, blank identifiers never trigger a
    /// fetch: if no identifier is usable the source is not contacted.
    pub async fn lookup_many<I: AsRef<str>>(
        &self,
        ids: &[I],
    ) -> Result<Vec<Result<CatalogEntry, CatalogError>>, CatalogError> {
        if ids.iter().all(|id| id.as_ref().trim().is_empty()) {
            return Ok(ids.iter().map(|_| Err(CatalogError::EmptyId)).collect());
        }

        let snapshot = self.ensure_fresh().await?;

        Ok(ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                if id.trim().is_empty() {
                    return Err(CatalogError::EmptyId);
                }
                snapshot
                    .find(id)
                    .cloned()
                    .ok_or_else(|| CatalogError::NotFound(id.to_string()))
            })
            .collect())
    }

    /// The published snapshot, fresh or not, without fetching
    pub async fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.slot.read().await.snapshot.clone()
    }

    /// Reports whether the cache is empty or populated, and how stale
    pub async fn state(&self) -> CacheState {
        let slot = self.slot.read().await;
        match &slot.snapshot {
            None => CacheState::Empty,
            Some(snapshot) => CacheState::Populated {
                fetched_at: snapshot.fetched_at(),
                entries: snapshot.len(),
                stale: slot.invalidated || !snapshot.is_fresh(self.ttl),
            },
        }
    }

    /// Forces the next call to refetch
    ///
    /// The current snapshot stays readable until the refetch succeeds. A
    /// refresh already in flight does not clear this request.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.invalidated = true;
        slot.generation = slot.generation.wrapping_add(1);
    }

    async fn fresh_snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        let slot = self.slot.read().await;
        if slot.invalidated {
            return None;
        }
        slot.snapshot
            .as_ref()
            .filter(|snapshot| snapshot.is_fresh(self.ttl))
            .cloned()
    }
}
