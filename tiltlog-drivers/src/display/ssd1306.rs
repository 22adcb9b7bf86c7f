//! SSD1306 128x64 OLED controller (I2C)
//!
//! Every I2C write starts with a control byte: 0x00 for a command stream,
//! 0x40 for display data. The panel runs in horizontal addressing mode so a
//! flush is one address window followed by the whole frame.

use embedded_hal::i2c::I2c;
use tiltlog_core::traits::{DisplayError, StatusDisplay};

use super::frame::{Frame, HEIGHT, PAGES, WIDTH};

/// Default 7-bit address (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// Display data bytes per I2C transfer
const DATA_CHUNK: usize = 16;

/// SSD1306 commands
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const CHARGE_PUMP: u8 = 0x8D;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const SEGMENT_REMAP: u8 = 0xA1;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const RESUME_RAM: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
}

/// Power-up sequence for a 128x64 panel with the internal charge pump
const INIT_SEQUENCE: [u8; 26] = [
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MULTIPLEX,
    (HEIGHT - 1) as u8,
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::CHARGE_PUMP,
    0x14,
    cmd::MEMORY_MODE,
    0x00,
    cmd::SEGMENT_REMAP,
    cmd::COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::RESUME_RAM,
    cmd::NORMAL_DISPLAY,
    cmd::DEACTIVATE_SCROLL,
    cmd::DISPLAY_ON,
];

/// SSD1306 panel with a local frame buffer
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
    frame: Frame,
}

impl<I2C: I2c> Ssd1306<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            frame: Frame::new(),
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Configure the controller and blank the panel
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.commands(&INIT_SEQUENCE)?;
        self.frame.clear();
        self.flush()
    }

    fn commands(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        for &command in commands {
            self.i2c
                .write(self.address, &[CONTROL_COMMAND, command])
                .map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }
}

impl<I2C: I2c> StatusDisplay for Ssd1306<I2C> {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_line(&mut self, text: &str, x: i32, y: i32) {
        self.frame.draw_text(text, x, y);
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.commands(&[
            cmd::COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ])?;

        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.frame.as_bytes().chunks(DATA_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(self.address, &packet[..=chunk.len()])
                .map_err(|_| DisplayError::Bus)?;
        }
        Ok(())
    }
}
