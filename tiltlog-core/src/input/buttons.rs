//! Pending button actions shared between edge handlers and the run loop

use portable_atomic::{AtomicBool, Ordering};

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Starts a capture
    A,
    /// Restarts into the USB bootloader
    B,
}

/// One pending flag per button
///
/// Raised from edge handlers, taken once by the run loop.
pub struct ButtonFlags {
    capture: AtomicBool,
    bootloader: AtomicBool,
}

impl ButtonFlags {
    pub const fn new() -> Self {
        Self {
            capture: AtomicBool::new(false),
            bootloader: AtomicBool::new(false),
        }
    }

    fn flag(&self, button: Button) -> &AtomicBool {
        match button {
            Button::A => &self.capture,
            Button::B => &self.bootloader,
        }
    }

    pub fn raise(&self, button: Button) {
        self.flag(button).store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self, button: Button) -> bool {
        self.flag(button).swap(false, Ordering::AcqRel)
    }
}

impl Default for ButtonFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_once() {
        let flags = ButtonFlags::new();
        assert!(!flags.take(Button::A));
        flags.raise(Button::A);
        flags.raise(Button::A);
        assert!(flags.take(Button::A));
        assert!(!flags.take(Button::A));
    }

    #[test]
    fn test_flags_independent() {
        let flags = ButtonFlags::new();
        flags.raise(Button::B);
        assert!(!flags.take(Button::A));
        assert!(flags.take(Button::B));
    }
}
