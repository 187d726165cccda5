use std::sync::Arc;

use crate::errors::BadgeError;
use crate::storage::Store;
use crate::types::now_millis;

/// Persisted per-identity view counter.
///
/// Each increment adds exactly one; callers gate increments through the
/// cooldown to approximate one view per client per window.
#[derive(Clone, Debug)]
pub struct ViewCounter {
    store: Arc<Store>,
}

impl ViewCounter {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Current count, 0 for an identity never seen.
    #[must_use]
    pub fn read(&self, identity: &str) -> u64 {
        self.store.view_count(identity)
    }

    /// Increment and return the new count.
    ///
    /// # Errors
    /// Propagates store persistence failures; the count is unchanged then.
    pub fn increment_and_read(&self, identity: &str) -> Result<u64, BadgeError> {
        let count = self.store.increment_views(identity, now_millis())?;
        log::debug!("views: identity={identity} count={count}");
        Ok(count)
    }
}
