use std::time::Duration;

use crate::types::Timestamp;

/// A fixed-period timer driven by explicit timestamps rather than an
/// internal wall clock, so the schedulers that own one can be ticked in
/// tests without real waits.
///
/// A fresh timer rings on the first check; after a reset it rings again
/// once the period has elapsed.
pub struct Timer {
    period: u64,
    last: Option<Timestamp>,
}

impl Timer {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.as_millis() as u64,
            last: None,
        }
    }

    /// Returns whether the period has elapsed since the last reset
    pub fn ringing(&self, now: Timestamp) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.period,
        }
    }

    pub fn reset(&mut self, now: Timestamp) {
        self.last = Some(now);
    }
}
