/// Stable, hash-derived identity of a cacheable badge request.
pub type Fingerprint = String;

/// The subject a badge describes (an upstream username).
pub type Identity = String;

/// Per (client address, identity) key used by the cooldown gate.
pub type ClientKey = String;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

#[inline]
#[must_use]
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

/// Saturating conversion of a duration to whole milliseconds.
#[inline]
#[must_use]
pub fn duration_millis(d: std::time::Duration) -> EpochMillis {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
