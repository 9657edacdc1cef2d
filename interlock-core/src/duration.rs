//! Millisecond durations for timeouts in configuration.
//!
//! [`DurationMs`] serializes as a plain integer so a config file can say
//! `"timeout": 10000` instead of serde's `{"secs": .., "nanos": ..}` shape.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration in whole milliseconds.
///
/// # Examples
///
/// ```
/// use interlock_core::DurationMs;
///
/// let d = DurationMs::from_secs(10);
/// assert_eq!(d.as_millis(), 10_000);
/// assert_eq!(d.to_string(), "10000ms");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMs(u64);

impl DurationMs {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Create from milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create from seconds, saturating on overflow.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Value in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert to `std::time::Duration`.
    pub fn to_std(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for DurationMs {
    fn from(d: Duration) -> Self {
        Self(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl From<DurationMs> for Duration {
    fn from(d: DurationMs) -> Self {
        d.to_std()
    }
}

impl std::fmt::Display for DurationMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
