use std::time::Duration;

/// Configuration for the badge cache.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Max number of rendered badges kept in the in-memory hot tier.
    pub capacity: usize,
    /// TTL applied by `TtlCache::set`.
    pub default_ttl: Duration,
    /// Cadence of the background purge of expired rows.
    pub purge_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            default_ttl: Duration::from_secs(5 * 60),
            purge_interval: Duration::from_secs(60 * 60),
        }
    }
}
