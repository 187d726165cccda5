use statbadge::cache::{CacheConfig, TtlCache, build_fingerprint};
use statbadge::storage::Store;
use std::sync::Arc;
use std::time::Duration;

const T0: i64 = 1_700_000_000_000;

fn memory_cache(capacity: usize) -> TtlCache {
    let config = CacheConfig { capacity, ..CacheConfig::default() };
    TtlCache::new(Arc::new(Store::in_memory()), config)
}

#[test]
fn test_set_then_get_within_ttl() {
    let cache = memory_cache(16);
    cache.set_at("stars:a:0011aabb", "<svg/>", Duration::from_secs(300), T0).unwrap();
    assert_eq!(cache.get_at("stars:a:0011aabb", T0 + 299_999).as_deref(), Some("<svg/>"));
    let m = cache.metrics_snapshot();
    assert_eq!((m.hits, m.misses, m.inserts), (1, 0, 1));
}

#[test]
fn test_entry_is_absent_once_expiry_is_reached() {
    let cache = memory_cache(16);
    cache.set_at("fp", "<svg/>", Duration::from_secs(300), T0).unwrap();
    // live only while expires_at > now
    assert!(cache.get_at("fp", T0 + 300_000).is_none());
    assert!(cache.get_at("fp", T0 + 1_000_000).is_none());
    assert_eq!(cache.metrics_snapshot().misses, 2);
}

#[test]
fn test_upsert_replaces_payload_and_expiry() {
    let cache = memory_cache(16);
    cache.set_at("fp", "old", Duration::from_secs(10), T0).unwrap();
    cache.set_at("fp", "new", Duration::from_secs(300), T0 + 5_000).unwrap();
    assert_eq!(cache.get_at("fp", T0 + 20_000).as_deref(), Some("new"));
    assert_eq!(cache.store().cache_len(), 1);
}

#[test]
fn test_hot_tier_eviction_falls_back_to_store() {
    let cache = memory_cache(1);
    cache.set_at("a", "A", Duration::from_secs(60), T0).unwrap();
    cache.set_at("b", "B", Duration::from_secs(60), T0).unwrap();
    assert_eq!(cache.hot_len(), 1);
    // "a" left the LRU tier but the store still serves it
    assert_eq!(cache.get_at("a", T0 + 1).as_deref(), Some("A"));
}

#[test]
fn test_purge_removes_only_expired_rows() {
    let cache = memory_cache(16);
    cache.set_at("short", "s", Duration::from_secs(1), T0).unwrap();
    cache.set_at("long", "l", Duration::from_secs(600), T0).unwrap();
    let purged = cache.purge_expired_at(T0 + 2_000).unwrap();
    assert_eq!(purged, 1);
    assert_eq!(cache.store().cache_len(), 1);
    assert_eq!(cache.metrics_snapshot().ttl_evictions, 1);
    assert_eq!(cache.get_at("long", T0 + 2_000).as_deref(), Some("l"));
    assert_eq!(cache.purge_expired_at(T0 + 2_000).unwrap(), 0);
}

#[test]
fn test_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badges.db");
    let fp = build_fingerprint("followers", "octocat", [("style", "flat")]);
    {
        let cache = TtlCache::new(Arc::new(Store::open(&path).unwrap()), CacheConfig::default());
        cache.set_with_ttl(&fp, "<svg>persisted</svg>", Duration::from_secs(300)).unwrap();
    }
    let cache = TtlCache::new(Arc::new(Store::open(&path).unwrap()), CacheConfig::default());
    assert_eq!(cache.hot_len(), 0);
    assert_eq!(cache.get(&fp).as_deref(), Some("<svg>persisted</svg>"));
    assert_eq!(cache.hot_len(), 1);
}

#[test]
fn test_fingerprint_shape() {
    let fp = build_fingerprint("stars", "octocat", [("color", "red"), ("style", "flat")]);
    let parts: Vec<&str> = fp.split(':').collect();
    assert_eq!(parts[0], "stars");
    assert_eq!(parts[1], "octocat");
    assert_eq!(parts[2].len(), 8);
    assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
}
