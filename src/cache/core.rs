use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::cache::config::CacheConfig;
use crate::cache::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::cache::policy::purge_expired;
use crate::errors::BadgeError;
use crate::storage::{CacheEntry, Store};
use crate::types::{EpochMillis, duration_millis, now_millis};

/// A thread-safe TTL cache of rendered badges: a bounded LRU hot tier written
/// through to the persistent store.
///
/// An entry whose expiry has passed is absent to readers whether or not the
/// purge has removed it yet.
#[derive(Clone)]
pub struct TtlCache {
    hot: Arc<Mutex<LruCache<String, CacheEntry>>>,
    store: Arc<Store>,
    config: CacheConfig,
    metrics: Arc<CacheMetrics>,
}

impl TtlCache {
    pub fn new(store: Arc<Store>, config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        TtlCache {
            hot: Arc::new(Mutex::new(LruCache::new(capacity))),
            store,
            config,
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Cached payload for `fingerprint`, if present and unexpired.
    pub fn get(&self, fingerprint: &str) -> Option<String> {
        self.get_at(fingerprint, now_millis())
    }

    /// `get` against an explicit clock.
    pub fn get_at(&self, fingerprint: &str, now: EpochMillis) -> Option<String> {
        {
            let mut hot = self.hot.lock();
            if let Some(entry) = hot.get(fingerprint) {
                if !entry.is_expired_at(now) {
                    self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.payload.clone());
                }
                // Lazy eviction on access; the store row goes with the next purge
                hot.pop(fingerprint);
            }
        }
        match self.store.cache_get(fingerprint, now) {
            Some(entry) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                let payload = entry.payload.clone();
                self.hot.lock().put(entry.fingerprint.clone(), entry);
                Some(payload)
            }
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Upsert `payload` under `fingerprint` with the configured default TTL.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the row.
    pub fn set(&self, fingerprint: &str, payload: &str) -> Result<(), BadgeError> {
        self.set_with_ttl(fingerprint, payload, self.config.default_ttl)
    }

    /// Upsert with an explicit TTL.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the row.
    pub fn set_with_ttl(&self, fingerprint: &str, payload: &str, ttl: Duration) -> Result<(), BadgeError> {
        self.set_at(fingerprint, payload, ttl, now_millis())
    }

    /// `set_with_ttl` against an explicit clock.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the row.
    pub fn set_at(
        &self,
        fingerprint: &str,
        payload: &str,
        ttl: Duration,
        now: EpochMillis,
    ) -> Result<(), BadgeError> {
        let entry = CacheEntry {
            fingerprint: fingerprint.to_string(),
            payload: payload.to_string(),
            expires_at: now.saturating_add(duration_millis(ttl)),
            created_at: now,
        };
        // Store first: the hot tier never holds a row the store rejected
        self.store.cache_upsert(entry.clone())?;
        self.hot.lock().put(entry.fingerprint.clone(), entry);
        self.metrics.inserts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Force a TTL purge now. Returns number evicted.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the purge.
    pub fn purge_expired_now(&self) -> Result<usize, BadgeError> {
        self.purge_expired_at(now_millis())
    }

    /// Purge against an explicit clock.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the purge.
    pub fn purge_expired_at(&self, now: EpochMillis) -> Result<usize, BadgeError> {
        purge_expired(&self.hot, &self.store, &self.metrics, now)
    }

    /// Get a snapshot of metrics.
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Number of badges in the hot tier.
    pub fn hot_len(&self) -> usize {
        self.hot.lock().len()
    }
}
