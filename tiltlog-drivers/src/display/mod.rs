//! Status displays

pub mod frame;
pub mod ssd1306;

pub use frame::Frame;
pub use ssd1306::Ssd1306;
