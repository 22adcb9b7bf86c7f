//! Time sources

use crate::datetime::DateTime;

/// Errors reported by the real-time clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Value rejected by the hardware
    InvalidDateTime,
    /// Clock is not running
    NotRunning,
}

/// Monotonic time and blocking delays
pub trait Clock {
    /// Microseconds since boot; never goes backwards
    fn now_us(&self) -> u64;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Milliseconds since boot
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

/// Wall clock
pub trait RealTimeClock {
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), ClockError>;
}
