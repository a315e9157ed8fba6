//! Microsecond precision UTC timestamps.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A UTC timestamp with microsecond precision, counted from the UNIX epoch.
///
/// A zome call's `expires_at` of `Timestamp(0)` means "never expires".
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display(fmt = "{}us", _0)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// The UNIX epoch.
    pub const ZERO: Timestamp = Timestamp(0);

    /// The current system time.
    pub fn now() -> Self {
        let micros = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_micros() as i64,
            Err(before) => -(before.duration().as_micros() as i64),
        };
        Timestamp(micros)
    }

    /// Microseconds since the UNIX epoch.
    pub fn as_micros(&self) -> i64 {
        self.0
    }

    /// Add a duration, clamping at `i64::MAX`.
    pub fn saturating_add(&self, duration: &Duration) -> Timestamp {
        let micros = i64::try_from(duration.as_micros()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_add(micros))
    }

    /// Subtract a duration, clamping at `i64::MIN`.
    pub fn saturating_sub(&self, duration: &Duration) -> Timestamp {
        let micros = i64::try_from(duration.as_micros()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_sub(micros))
    }
}
