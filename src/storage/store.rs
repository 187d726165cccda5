use parking_lot::RwLock;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::BadgeError;
use crate::storage::snapshot::{CacheEntry, StoreState, ViewRecord, decode_snapshot, encode_snapshot};
use crate::types::EpochMillis;

/// Persistent record store for view counters and rendered-badge cache rows.
///
/// State lives in memory behind a single lock and every mutation rewrites the
/// snapshot file atomically before the lock is released, so a mutation is
/// either fully applied and durable or rolled back.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
}

impl Store {
    /// Open (or create) the snapshot at `path`.
    ///
    /// # Errors
    /// Fails if the directory cannot be created, the file cannot be read, or it
    /// does not decode as a snapshot of a supported version.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BadgeError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let state = if path.exists() {
            let bytes = fs::read(&path)?;
            decode_snapshot(&bytes)?
        } else {
            StoreState::default()
        };
        log::info!(
            "store: opened path={}, views={}, cache_entries={}",
            path.display(),
            state.views.len(),
            state.cache_entries.len()
        );
        let store = Store { path: Some(path), state: RwLock::new(state) };
        store.persist(&store.state.read())?;
        Ok(store)
    }

    /// A store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Store { path: None, state: RwLock::new(StoreState::default()) }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, state: &StoreState) -> Result<(), BadgeError> {
        let Some(dest) = self.path.as_deref() else { return Ok(()) };
        let bytes = encode_snapshot(state)?;
        let parent = dest.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
        // Temp file in the same directory so the rename is atomic
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(dest).map_err(|e| BadgeError::Io(e.error.to_string()))?;
        Ok(())
    }

    // --- view counters ---

    #[must_use]
    pub fn view_count(&self, identity: &str) -> u64 {
        self.state.read().views.get(identity).map_or(0, |r| r.count)
    }

    #[must_use]
    pub fn view_record(&self, identity: &str) -> Option<ViewRecord> {
        self.state.read().views.get(identity).cloned()
    }

    /// Add one to the counter for `identity`, creating it at 1. Returns the new count.
    ///
    /// # Errors
    /// Returns `Io` if the snapshot cannot be written; the increment is not applied.
    pub fn increment_views(&self, identity: &str, now: EpochMillis) -> Result<u64, BadgeError> {
        let mut state = self.state.write();
        let previous = state.views.get(identity).cloned();
        let record = match &previous {
            Some(r) => ViewRecord { count: r.count.saturating_add(1), updated_at: now, ..r.clone() },
            None => ViewRecord { identity: identity.to_string(), count: 1, created_at: now, updated_at: now },
        };
        let count = record.count;
        state.views.insert(identity.to_string(), record);
        if let Err(e) = self.persist(&state) {
            match previous {
                Some(r) => state.views.insert(identity.to_string(), r),
                None => state.views.remove(identity),
            };
            log::error!("store: failed to persist view increment for {identity}: {e}");
            return Err(e);
        }
        Ok(count)
    }

    // --- cache rows ---

    /// Payload for `fingerprint` unless it is missing or expired at `now`.
    #[must_use]
    pub fn cache_get(&self, fingerprint: &str, now: EpochMillis) -> Option<CacheEntry> {
        self.state.read().cache_entries.get(fingerprint).filter(|e| !e.is_expired_at(now)).cloned()
    }

    /// Insert or replace the row for `entry.fingerprint`.
    ///
    /// # Errors
    /// Returns `Io` if the snapshot cannot be written; the previous row is kept.
    pub fn cache_upsert(&self, entry: CacheEntry) -> Result<(), BadgeError> {
        let mut state = self.state.write();
        let key = entry.fingerprint.clone();
        let previous = state.cache_entries.insert(key.clone(), entry);
        if let Err(e) = self.persist(&state) {
            match previous {
                Some(p) => state.cache_entries.insert(key, p),
                None => state.cache_entries.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Delete every row expired at `now`. Returns the number removed.
    ///
    /// # Errors
    /// Returns `Io` if the snapshot cannot be written; no rows are removed.
    pub fn cache_purge_expired(&self, now: EpochMillis) -> Result<usize, BadgeError> {
        let mut state = self.state.write();
        let expired: Vec<String> = state
            .cache_entries
            .iter()
            .filter(|(_, e)| e.is_expired_at(now))
            .map(|(k, _)| k.clone())
            .collect();
        if expired.is_empty() {
            return Ok(0);
        }
        let removed: Vec<CacheEntry> =
            expired.iter().filter_map(|k| state.cache_entries.remove(k)).collect();
        if let Err(e) = self.persist(&state) {
            for entry in removed {
                state.cache_entries.insert(entry.fingerprint.clone(), entry);
            }
            return Err(e);
        }
        Ok(removed.len())
    }

    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.state.read().cache_entries.len()
    }
}
