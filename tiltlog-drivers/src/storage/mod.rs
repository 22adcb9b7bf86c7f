//! SD card storage

pub mod fat;
pub mod sdcard;

pub use sdcard::SdStorage;

use embedded_sdmmc::Timestamp;
use tiltlog_core::datetime::DateTime;

/// Block device on a card that can leave its slot
///
/// With every volume closed the card may be swapped, so the next access has
/// to identify it again.
pub trait Removable {
    /// Identify the card again on the next access
    fn mark_uninit(&self);

    /// A volume was opened on the card
    fn mark_ready(&self) {}
}

/// Directory entry timestamp for a wall clock reading
///
/// Without a valid reading files are stamped 1980-01-01 00:00:00, the
/// earliest time FAT can store.
pub fn timestamp(now: Option<&DateTime>) -> Timestamp {
    now.and_then(|dt| {
        Timestamp::from_calendar(dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second).ok()
    })
    .unwrap_or(Timestamp {
        year_since_1970: 10,
        zero_indexed_month: 0,
        zero_indexed_day: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_from_datetime() {
        let ts = timestamp(Some(&DateTime {
            year: 2026,
            month: 10,
            day: 19,
            hour: 14,
            minute: 30,
            second: 5,
        }));
        assert_eq!(ts.year_since_1970, 56);
        assert_eq!(ts.zero_indexed_month, 9);
        assert_eq!(ts.zero_indexed_day, 18);
        assert_eq!((ts.hours, ts.minutes, ts.seconds), (14, 30, 5));
    }

    #[test]
    fn test_timestamp_fallback() {
        let ts = timestamp(None);
        assert_eq!(ts.year_since_1970, 10);
        assert_eq!(ts.zero_indexed_month, 0);
    }
}
