//! Button input
//!
//! Edge handlers only debounce and raise flags; the run loop takes the flags
//! and performs the actions.

pub mod buttons;
pub mod debounce;

pub use buttons::{Button, ButtonFlags};
pub use debounce::Debouncer;
