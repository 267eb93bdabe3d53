use std::time::SystemTime;

use log::warn;
use thiserror::Error;

use crate::types::Timestamp;

/// Error type for clock operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeError {
    /// System time is before UNIX epoch
    #[error("system time is before UNIX epoch")]
    SystemTimeBeforeEpoch,
}

/// Source of "now" for the synchronization schedulers.
///
/// Both schedulers take their clock at construction, so tests can drive
/// them with a manually-advanced implementation instead of wall time.
pub trait GameClock {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// [`GameClock`] backed by the system wall clock, reading milliseconds
/// since the UNIX epoch
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Returns the current timestamp in milliseconds since UNIX epoch.
    ///
    /// # Errors
    /// Returns `TimeError::SystemTimeBeforeEpoch` if system time is before
    /// UNIX epoch.
    pub fn try_now() -> Result<Timestamp, TimeError> {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as Timestamp)
            .map_err(|_| TimeError::SystemTimeBeforeEpoch)
    }
}

impl GameClock for SystemClock {
    fn now(&self) -> Timestamp {
        match Self::try_now() {
            Ok(now) => now,
            Err(error) => {
                warn!("SystemClock: {error}");
                0
            }
        }
    }
}
