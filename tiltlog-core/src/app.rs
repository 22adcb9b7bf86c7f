//! Run loop step
//!
//! The firmware calls [`Logger::feed`] for every byte waiting on the serial
//! link, then [`Logger::service_buttons`], then sleeps for the loop period.
//! Everything runs on that single thread of control.

use core::fmt::Write;

use crate::config::LoggerConfig;
use crate::console::{Dispatcher, Submitted};
use crate::device::{Board, Device, Peripherals};
use crate::error::Error;
use crate::input::{Button, ButtonFlags};

/// Requests the loop cannot serve itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemRequest {
    /// Restart into the USB bootloader immediately, without closing anything
    EnterBootloader,
}

/// Console plus device
pub struct Logger<B: Board> {
    console: Dispatcher,
    device: Device<B>,
}

impl<B: Board> Logger<B> {
    pub fn new(config: LoggerConfig, hw: Peripherals<B>) -> Self {
        Self {
            console: Dispatcher::new(),
            device: Device::new(config, hw),
        }
    }

    pub fn device(&self) -> &Device<B> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device<B> {
        &mut self.device
    }

    /// Power-on sequence, ending with the first prompt
    pub fn boot<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
        let result = self.device.boot(out);
        self.console.finish(out);
        result
    }

    /// Feed one serial byte; returns the outcome if a line was executed
    pub fn feed<W: Write>(&mut self, byte: u8, out: &mut W) -> Option<Result<(), Error>> {
        let result = match self.console.feed(byte, out)? {
            Submitted::Command(command) => self.device.execute(command, out),
            Submitted::Shortcut(shortcut) => self.device.run_shortcut(shortcut, out),
            Submitted::NotFound => Err(Error::CommandNotFound),
        };
        self.console.finish(out);
        Some(result)
    }

    /// Act on pending button flags
    ///
    /// A capture request runs here; a bootloader request is handed back to
    /// the caller, which must not return from it.
    pub fn service_buttons<W: Write>(
        &mut self,
        flags: &ButtonFlags,
        out: &mut W,
    ) -> Option<SystemRequest> {
        if flags.take(Button::A) {
            let _ = self.device.button_capture(out);
        }
        if flags.take(Button::B) {
            return Some(SystemRequest::EnterBootloader);
        }
        None
    }
}
