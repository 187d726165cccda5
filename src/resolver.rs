use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

use crate::badge::BadgeKind;
use crate::cooldown::CooldownGate;
use crate::counter::ViewCounter;
use crate::errors::BadgeError;
use crate::provider::ProfileProvider;

/// Format a count with a magnitude suffix: `1.2M`, `3.4k`, or the plain integer.
#[must_use]
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        one_decimal(n, 1_000_000, 'M')
    } else if n >= 1_000 {
        one_decimal(n, 1_000, 'k')
    } else {
        n.to_string()
    }
}

/// `n / unit` to one decimal place with exact ties rounded up. `{:.1}` rounds
/// ties to even, so `1250` would otherwise read `1.2k`.
fn one_decimal(n: u64, unit: u64, suffix: char) -> String {
    // n / unit ends in exactly .x5 only for odd multiples of unit / 4
    if n % (unit / 4) == 0 && n % (unit / 2) != 0 {
        let tenths = (u128::from(n) * 10).div_ceil(u128::from(unit));
        return format!("{}.{}{suffix}", tenths / 10, tenths % 10);
    }
    format!("{:.1}{suffix}", n as f64 / unit as f64)
}

/// Short date such as `Jan 25, 2011`, in UTC.
#[must_use]
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// Maps a badge kind to its display value, locally or via the provider.
#[derive(Clone)]
pub struct StatResolver {
    counter: ViewCounter,
    cooldown: Arc<CooldownGate>,
    provider: Arc<dyn ProfileProvider>,
}

impl StatResolver {
    pub fn new(counter: ViewCounter, cooldown: Arc<CooldownGate>, provider: Arc<dyn ProfileProvider>) -> Self {
        Self { counter, cooldown, provider }
    }

    #[must_use]
    pub fn cooldown(&self) -> &Arc<CooldownGate> {
        &self.cooldown
    }

    /// # Errors
    /// `NotFound`/`RateLimited`/`Timeout`/`Upstream*` from the provider, or a
    /// store failure while counting a view.
    pub async fn resolve(&self, kind: BadgeKind, identity: &str, client_key: &str) -> Result<String, BadgeError> {
        let provider = &self.provider;
        let value = match kind {
            BadgeKind::ViewCount => return self.resolve_views_blocking(identity, client_key).await.map(|n| n.to_string()),
            BadgeKind::Stars => format_count(provider.total_stars(identity).await?),
            BadgeKind::Followers => format_count(provider.fetch_user(identity).await?.followers),
            BadgeKind::Following => format_count(provider.fetch_user(identity).await?.following),
            BadgeKind::Repos => format_count(provider.fetch_user(identity).await?.public_repos),
            BadgeKind::Gists => format_count(provider.fetch_user(identity).await?.public_gists),
            BadgeKind::Created => format_date(&provider.fetch_user(identity).await?.created_at),
            BadgeKind::Updated => format_date(&provider.fetch_user(identity).await?.updated_at),
        };
        Ok(value)
    }

    /// Count a view unless this client already did within the cooldown window.
    ///
    /// The cooldown is set before the increment. Two near-simultaneous first
    /// requests from one client can both pass the check and count twice; that
    /// imprecision is accepted rather than serialising every view.
    ///
    /// # Errors
    /// Propagates store persistence failures.
    pub fn resolve_views(&self, identity: &str, client_key: &str) -> Result<u64, BadgeError> {
        self.resolve_views_at(identity, client_key, Instant::now())
    }

    /// `resolve_views` against an explicit instant.
    ///
    /// # Errors
    /// Propagates store persistence failures.
    pub fn resolve_views_at(&self, identity: &str, client_key: &str, now: Instant) -> Result<u64, BadgeError> {
        if self.cooldown.is_on_cooldown_at(client_key, now) {
            return Ok(self.counter.read(identity));
        }
        self.cooldown.touch_at(client_key, now);
        self.counter.increment_and_read(identity)
    }

    // An increment rewrites the snapshot file; keep it off the async workers
    async fn resolve_views_blocking(&self, identity: &str, client_key: &str) -> Result<u64, BadgeError> {
        let this = self.clone();
        let (identity, client_key) = (identity.to_string(), client_key.to_string());
        tokio::task::spawn_blocking(move || this.resolve_views(&identity, &client_key))
            .await
            .map_err(|e| BadgeError::Io(format!("view count task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn counts_get_magnitude_suffixes() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1.0k");
        assert_eq!(format_count(1_234), "1.2k");
        assert_eq!(format_count(56_789), "56.8k");
        assert_eq!(format_count(1_000_000), "1.0M");
        assert_eq!(format_count(2_345_678), "2.3M");
    }

    #[test]
    fn exact_ties_round_up() {
        assert_eq!(format_count(1_250), "1.3k");
        assert_eq!(format_count(1_750), "1.8k");
        assert_eq!(format_count(2_250), "2.3k");
        assert_eq!(format_count(1_250_000), "1.3M");
        assert_eq!(format_count(999_750), "999.8k");
        // not a tie once divided in binary floating point
        assert_eq!(format_count(1_150), "1.1k");
        assert_eq!(format_count(1_500), "1.5k");
    }

    #[test]
    fn dates_render_short() {
        let dt = Utc.with_ymd_and_hms(2011, 1, 25, 18, 44, 36).unwrap();
        assert_eq!(format_date(&dt), "Jan 25, 2011");
        let dt = Utc.with_ymd_and_hms(2023, 7, 4, 0, 0, 0).unwrap();
        assert_eq!(format_date(&dt), "Jul 4, 2023");
    }
}
