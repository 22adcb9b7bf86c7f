//! Monotonic clock and the on-chip RTC

use core::cell::RefCell;

use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime as RtcDateTime, DayOfWeek, Rtc};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{block_for, Duration, Instant};
use embedded_sdmmc::{TimeSource, Timestamp};
use tiltlog_core::datetime::DateTime;
use tiltlog_core::traits::{Clock, ClockError, RealTimeClock};
use tiltlog_drivers::storage::timestamp;

/// RTC shared by the `setrtc` command and file timestamps
static RTC_CELL: Mutex<CriticalSectionRawMutex, RefCell<Option<Rtc<'static, RTC>>>> =
    Mutex::new(RefCell::new(None));

/// Embassy time driver
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms.into()));
    }
}

/// Handle to the RTC stored in [`RTC_CELL`]
#[derive(Clone, Copy)]
pub struct SharedRtc;

impl SharedRtc {
    /// Take ownership of the RTC; call once at startup
    pub fn install(rtc: Rtc<'static, RTC>) -> Self {
        RTC_CELL.lock(|cell| cell.replace(Some(rtc)));
        Self
    }

    /// Current wall time, or `None` until the clock has been set
    pub fn now(&self) -> Option<DateTime> {
        RTC_CELL.lock(|cell| {
            let now = cell.borrow().as_ref()?.now().ok()?;
            Some(DateTime {
                year: now.year,
                month: now.month,
                day: now.day,
                hour: now.hour,
                minute: now.minute,
                second: now.second,
            })
        })
    }
}

fn day_of_week(datetime: &DateTime) -> DayOfWeek {
    match datetime.day_of_week() {
        0 => DayOfWeek::Sunday,
        1 => DayOfWeek::Monday,
        2 => DayOfWeek::Tuesday,
        3 => DayOfWeek::Wednesday,
        4 => DayOfWeek::Thursday,
        5 => DayOfWeek::Friday,
        _ => DayOfWeek::Saturday,
    }
}

impl RealTimeClock for SharedRtc {
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), ClockError> {
        let value = RtcDateTime {
            year: datetime.year,
            month: datetime.month,
            day: datetime.day,
            day_of_week: day_of_week(datetime),
            hour: datetime.hour,
            minute: datetime.minute,
            second: datetime.second,
        };
        RTC_CELL.lock(|cell| match cell.borrow_mut().as_mut() {
            Some(rtc) => rtc
                .set_datetime(value)
                .map_err(|_| ClockError::InvalidDateTime),
            None => Err(ClockError::NotRunning),
        })
    }
}

impl TimeSource for SharedRtc {
    fn get_timestamp(&self) -> Timestamp {
        timestamp(self.now().as_ref())
    }
}
