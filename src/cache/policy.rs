use lru::LruCache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::cache::metrics::CacheMetrics;
use crate::errors::BadgeError;
use crate::storage::{CacheEntry, Store};
use crate::types::{EpochMillis, Fingerprint};

/// Removes expired badges from the hot tier and the store. Returns the number
/// of persisted rows removed.
pub fn purge_expired(
    hot: &Arc<Mutex<LruCache<Fingerprint, CacheEntry>>>,
    store: &Store,
    metrics: &CacheMetrics,
    now: EpochMillis,
) -> Result<usize, BadgeError> {
    {
        let mut hot = hot.lock();
        let expired: Vec<Fingerprint> =
            hot.iter().filter(|(_, e)| e.is_expired_at(now)).map(|(k, _)| k.clone()).collect();
        for key in expired {
            hot.pop(&key);
        }
    }
    let count = store.cache_purge_expired(now)?;
    if count > 0 {
        metrics.ttl_evictions.fetch_add(count as u64, Ordering::Relaxed);
        log::debug!("cache: ttl purge evicted={count}");
    }
    Ok(count)
}
