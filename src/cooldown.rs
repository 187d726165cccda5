//! Per (client, identity) cooldown window suppressing repeated view increments.
//!
//! State is process-local and volatile; a restart clears every cooldown.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::ClientKey;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30 * 60);

/// Key the gate by client address and identity.
#[must_use]
pub fn client_key(addr: &str, identity: &str) -> ClientKey {
    format!("{addr}:{identity}")
}

#[derive(Debug)]
pub struct CooldownGate {
    window: Duration,
    entries: Mutex<HashMap<ClientKey, Instant>>,
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl CooldownGate {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, entries: Mutex::new(HashMap::new()) }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_on_cooldown(&self, key: &str) -> bool {
        self.is_on_cooldown_at(key, Instant::now())
    }

    /// Staleness is checked here, so an entry the sweep has not reached yet
    /// still stops counting once the window has elapsed.
    pub fn is_on_cooldown_at(&self, key: &str, now: Instant) -> bool {
        self.entries
            .lock()
            .get(key)
            .is_some_and(|last| now.saturating_duration_since(*last) < self.window)
    }

    pub fn touch(&self, key: &str) {
        self.touch_at(key, Instant::now());
    }

    pub fn touch_at(&self, key: &str, now: Instant) {
        self.entries.lock().insert(key.to_string(), now);
    }

    /// Evict entries older than the window. Returns the number evicted.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, last| now.saturating_duration_since(*last) < self.window);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
