//! Persistent record store: view counters and rendered-badge cache rows kept in
//! one snapshot file.
pub mod snapshot;
pub mod store;

pub use snapshot::{CacheEntry, StoreState, ViewRecord};
pub use store::Store;
