//! Board-agnostic core logic for the tiltlog SD card logger
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (storage, inertial sensor, indicator, buzzer,
//!   status display, clocks)
//! - Mount state machine and the table of logical volumes
//! - Serial command line buffer, command parser and dispatcher
//! - Capture pipeline (orientation math, CSV records)
//! - Button debounce and pending-action flags
//! - Device state and the cooperative run loop step

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod capture;
pub mod config;
pub mod console;
pub mod datetime;
pub mod device;
pub mod error;
pub mod feedback;
pub mod input;
pub mod traits;
pub mod volume;

#[cfg(test)]
pub(crate) mod mock;

pub use app::{Logger, SystemRequest};
pub use error::Error;
