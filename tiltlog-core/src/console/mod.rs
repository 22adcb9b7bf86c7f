//! Serial command console
//!
//! Bytes arrive one at a time from the serial link. The [`LineBuffer`] edits
//! the current line, the [`Dispatcher`] echoes, prompts and turns completed
//! lines into [`Command`]s or [`Shortcut`]s for the device to run.

pub mod command;
pub mod dispatcher;
pub mod line;

pub use command::{parse_line, Args, Command, CommandInfo, Parsed, Shortcut, COMMANDS};
pub use dispatcher::{Dispatcher, Submitted};
pub use line::{LineBuffer, LineEvent};
