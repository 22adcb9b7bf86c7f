//! Serial console adapters
//!
//! [`SerialWriter`] lets the console code use `core::fmt::Write` on any
//! `embedded_io` transmitter and turns every `\n` into `\r\n` for the
//! terminal. [`SerialReader`] polls a receiver for one byte without
//! blocking.

use core::fmt;

use embedded_io::{Read, ReadReady, Write};

/// Line-ending translating writer
pub struct SerialWriter<T> {
    tx: T,
}

impl<T: Write> SerialWriter<T> {
    pub fn new(tx: T) -> Self {
        Self { tx }
    }

    pub fn into_inner(self) -> T {
        self.tx
    }

    /// Wait until everything written so far has left the buffer
    pub fn flush(&mut self) -> Result<(), T::Error> {
        self.tx.flush()
    }
}

impl<T: Write> fmt::Write for SerialWriter<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.tx.write_all(first.as_bytes()).map_err(|_| fmt::Error)?;
        }
        for line in lines {
            self.tx.write_all(b"\r\n").map_err(|_| fmt::Error)?;
            self.tx.write_all(line.as_bytes()).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

/// Non-blocking byte reader
pub struct SerialReader<R> {
    rx: R,
}

impl<R: Read + ReadReady> SerialReader<R> {
    pub fn new(rx: R) -> Self {
        Self { rx }
    }

    /// Next received byte, if one is waiting
    ///
    /// Receive errors (overrun, framing) drop the byte.
    pub fn read_byte(&mut self) -> Option<u8> {
        if !self.rx.read_ready().unwrap_or(false) {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}
