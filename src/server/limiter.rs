use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracked clients above which expired windows are dropped on the next check.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request limiter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max: u32, window: Duration) -> Self {
        Self { max: max.max(1), window, windows: Mutex::new(HashMap::new()) }
    }

    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    /// Count one request from `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut windows = self.windows.lock();
        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.saturating_duration_since(w.started) < window);
        }
        let w = windows.entry(key.to_string()).or_insert(Window { started: now, count: 0 });
        if now.saturating_duration_since(w.started) >= self.window {
            *w = Window { started: now, count: 0 };
        }
        if w.count >= self.max {
            let elapsed = now.saturating_duration_since(w.started);
            return Decision::Limited { retry_after: self.window.saturating_sub(elapsed) };
        }
        w.count += 1;
        Decision::Allowed { remaining: self.max - w.count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_after_max_then_resets() {
        let rl = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert_eq!(rl.check_at("a", t0), Decision::Allowed { remaining: 1 });
        assert_eq!(rl.check_at("a", t0), Decision::Allowed { remaining: 0 });
        assert_eq!(
            rl.check_at("a", t0 + Duration::from_secs(20)),
            Decision::Limited { retry_after: Duration::from_secs(40) }
        );
        // other clients are unaffected
        assert_eq!(rl.check_at("b", t0), Decision::Allowed { remaining: 1 });
        assert_eq!(rl.check_at("a", t0 + Duration::from_secs(60)), Decision::Allowed { remaining: 1 });
    }
}
