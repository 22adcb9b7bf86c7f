//! State shared between tasks

use tiltlog_core::input::ButtonFlags;

/// Button presses waiting for the logger loop
pub static BUTTONS: ButtonFlags = ButtonFlags::new();
