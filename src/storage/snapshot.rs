use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::BadgeError;
use crate::types::{EpochMillis, Fingerprint, Identity};

/// Persisted view counter row; unique per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub identity: Identity,
    pub count: u64,
    pub created_at: EpochMillis,
    pub updated_at: EpochMillis,
}

/// Persisted rendered-badge cache row; unique per fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub payload: String,
    pub expires_at: EpochMillis,
    pub created_at: EpochMillis,
}

impl CacheEntry {
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: EpochMillis) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub views: HashMap<Identity, ViewRecord>,
    pub cache_entries: HashMap<Fingerprint, CacheEntry>,
}

// Snapshot file wrapper with magic + version for forward/backward compatibility
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"SBG1";
pub const SNAPSHOT_CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    magic: [u8; 4],
    version: u32,
    state: StoreState,
}

/// Encode the store state with the magic+version header.
pub fn encode_snapshot(state: &StoreState) -> Result<Vec<u8>, BadgeError> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        magic: [u8; 4],
        version: u32,
        state: &'a StoreState,
    }
    let file = SnapshotRef { magic: SNAPSHOT_MAGIC, version: SNAPSHOT_CURRENT_VERSION, state };
    Ok(encode_to_vec(&file, standard())?)
}

/// Decode store state, rejecting foreign files and newer format versions.
pub fn decode_snapshot(bytes: &[u8]) -> Result<StoreState, BadgeError> {
    if bytes.len() < 4 || bytes[0..4] != SNAPSHOT_MAGIC {
        return Err(BadgeError::SnapshotError("missing or invalid snapshot magic".into()));
    }
    let (file, _) = decode_from_slice::<SnapshotFile, _>(bytes, standard())?;
    if file.version > SNAPSHOT_CURRENT_VERSION {
        return Err(BadgeError::SnapshotError(format!(
            "snapshot format version {} is newer than this build supports",
            file.version
        )));
    }
    Ok(file.state)
}
