//! Time source for task ids.
//!
//! Ids are creation timestamps, so the store takes its clock as a trait
//! object and tests can pin it.

use chrono::Utc;

/// Provides the current time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub millis: u64,
}

impl FixedClock {
    pub fn new(millis: u64) -> FixedClock {
        FixedClock { millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis
    }
}
