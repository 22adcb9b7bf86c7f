//! Embassy async tasks

pub mod buttons;
pub mod logger;

pub use buttons::buttons_task;
pub use logger::{logger_task, ConsoleRx, ConsoleTx};
