use statbadge::counter::ViewCounter;
use statbadge::cooldown::{CooldownGate, client_key};
use statbadge::errors::BadgeError;
use statbadge::storage::Store;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_first_increment_creates_counter_at_one() {
    let counter = ViewCounter::new(Arc::new(Store::in_memory()));
    assert_eq!(counter.read("alice"), 0);
    assert_eq!(counter.increment_and_read("alice").unwrap(), 1);
    assert_eq!(counter.increment_and_read("alice").unwrap(), 2);
    assert_eq!(counter.read("alice"), 2);
    assert_eq!(counter.read("bob"), 0);
}

#[test]
fn test_counts_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("badges.db");
    {
        let store = Arc::new(Store::open(&path).unwrap());
        let counter = ViewCounter::new(store.clone());
        for _ in 0..3 {
            counter.increment_and_read("alice").unwrap();
        }
        let record = store.view_record("alice").unwrap();
        assert!(record.created_at <= record.updated_at);
    }
    let store = Store::open(&path).unwrap();
    assert_eq!(store.view_count("alice"), 3);
}

#[test]
fn test_failed_write_leaves_count_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let store = Arc::new(Store::open(data_dir.join("badges.db")).unwrap());
    let counter = ViewCounter::new(store.clone());
    assert_eq!(counter.increment_and_read("alice").unwrap(), 1);

    std::fs::remove_dir_all(&data_dir).unwrap();
    let err = counter.increment_and_read("alice").unwrap_err();
    assert!(matches!(err, BadgeError::Io(_)));
    assert_eq!(counter.read("alice"), 1);
}

#[test]
fn test_concurrent_increments_are_not_lost() {
    let counter = ViewCounter::new(Arc::new(Store::in_memory()));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let counter = counter.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    counter.increment_and_read("alice").unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(counter.read("alice"), 400);
}

#[test]
fn test_cooldown_gate_per_client_and_identity() {
    let gate = CooldownGate::new(Duration::from_secs(1800));
    let t0 = Instant::now();
    let key = client_key("1.2.3.4", "alice");
    assert!(!gate.is_on_cooldown_at(&key, t0));
    gate.touch_at(&key, t0);
    assert!(gate.is_on_cooldown_at(&key, t0 + Duration::from_secs(1799)));
    assert!(!gate.is_on_cooldown_at(&key, t0 + Duration::from_secs(1801)));
    assert!(!gate.is_on_cooldown_at(&client_key("1.2.3.4", "bob"), t0));
    assert!(!gate.is_on_cooldown_at(&client_key("5.6.7.8", "alice"), t0));
    assert_eq!(gate.sweep_at(t0 + Duration::from_secs(3600)), 1);
    assert!(gate.is_empty());
}
