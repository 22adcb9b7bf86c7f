//! Indicator, buzzer and display feedback patterns

use crate::config::{BeepPattern, BlinkPattern};
use crate::console::Shortcut;
use crate::traits::{Buzzer, Clock, Color, DisplayError, Indicator, StatusDisplay};

/// Left edge of banner text in pixels
pub const BANNER_X: i32 = 2;
/// Top of the first banner line
pub const BANNER_TOP_Y: i32 = 28;
/// Top of the second banner line
pub const BANNER_BOTTOM_Y: i32 = 37;

/// Blink `color` on and off, leaving the light off
pub fn blink<L: Indicator, C: Clock>(
    light: &mut L,
    clock: &mut C,
    color: Color,
    pattern: BlinkPattern,
) {
    for _ in 0..pattern.times {
        light.set_color(color);
        clock.delay_ms(pattern.period_ms);
        light.set_color(Color::Off);
        clock.delay_ms(pattern.period_ms);
    }
}

/// Failure: magenta blink, then a steady colour
pub fn failure<L: Indicator, C: Clock>(light: &mut L, clock: &mut C, settle: Color) {
    blink(light, clock, Color::Magenta, BlinkPattern::STANDARD);
    light.set_color(settle);
}

/// Long operation finished: blue blink, then green
pub fn done<L: Indicator, C: Clock>(light: &mut L, clock: &mut C) {
    blink(light, clock, Color::Blue, BlinkPattern::STANDARD);
    light.set_color(Color::Green);
}

pub fn beep<B: Buzzer>(buzzer: &mut B, pattern: BeepPattern) {
    buzzer.beep(pattern.freq_hz, pattern.duration_ms, pattern.repeat);
}

/// Two lines of status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Banner {
    pub top: &'static str,
    pub bottom: Option<&'static str>,
}

impl Banner {
    pub const fn new(top: &'static str, bottom: &'static str) -> Self {
        Self {
            top,
            bottom: Some(bottom),
        }
    }

    pub const fn single(top: &'static str) -> Self {
        Self { top, bottom: None }
    }

    pub const BOOT: Self = Self::new("System", "Started");
    pub const FAILED: Self = Self::new("Operation", "Failed");
    pub const BUTTON_CAPTURE: Self = Self::new("Capturing", "Data (BTN)...");
    pub const BUTTON_CAPTURE_DONE: Self = Self::new("Data OK", "by Button A");

    /// Replace the display content with this banner
    ///
    /// Display faults are not fatal; the device keeps the last one for the
    /// run loop to log.
    pub fn show<D: StatusDisplay>(&self, display: &mut D) -> Result<(), DisplayError> {
        display.clear();
        display.draw_line(self.top, BANNER_X, BANNER_TOP_Y);
        if let Some(bottom) = self.bottom {
            display.draw_line(bottom, BANNER_X, BANNER_BOTTOM_Y);
        }
        display.flush()
    }
}

impl Shortcut {
    /// Banner shown while the shortcut runs
    pub fn busy_banner(&self) -> Banner {
        match self {
            Shortcut::Mount => Banner::new("Mounting", "SD..."),
            Shortcut::Unmount => Banner::new("Unmounting", "SD..."),
            Shortcut::List => Banner::new("Listing", "Files..."),
            Shortcut::ReadCapture => Banner::new("Reading", "File..."),
            Shortcut::FreeSpace => Banner::new("Getting Free", "Space..."),
            Shortcut::Capture => Banner::new("Capturing", "Data..."),
            Shortcut::Format => Banner::new("Formatting", "Started..."),
            Shortcut::Help => Banner::new("Help", "Requested"),
        }
    }

    /// Banner shown after a successful run, if any
    pub fn done_banner(&self) -> Option<Banner> {
        match self {
            Shortcut::Mount => Some(Banner::single("SD Mounted")),
            Shortcut::Unmount => Some(Banner::single("SD Unmounted")),
            Shortcut::List => Some(Banner::single("Listing Done")),
            Shortcut::ReadCapture => Some(Banner::single("File Read")),
            Shortcut::FreeSpace => Some(Banner::single("Space Obtained")),
            Shortcut::Capture => Some(Banner::single("Data Captured")),
            Shortcut::Format => Some(Banner::new("Formatting", "Done")),
            Shortcut::Help => None,
        }
    }
}
