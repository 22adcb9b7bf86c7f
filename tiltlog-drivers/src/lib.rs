//! Peripheral driver implementations
//!
//! Concrete implementations of the traits defined in tiltlog-core, written
//! against the embedded-hal 1.0 and embedded-io traits so they run on any
//! HAL that provides them:
//!
//! - MPU6050 inertial sensor (I2C)
//! - SSD1306 128x64 OLED status display (I2C)
//! - Common-cathode RGB indicator (three GPIO outputs)
//! - PWM buzzer
//! - SD card storage over `embedded-sdmmc`, with FAT free space and quick
//!   format helpers
//! - Serial console reader and CRLF writer

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buzzer;
pub mod console;
pub mod display;
pub mod indicator;
pub mod sensor;
pub mod storage;
