//! Line dispatch and console protocol

use core::fmt::Write;

use super::command::{parse_line, Command, Parsed, Shortcut};
use super::line::{LineBuffer, LineEvent};
use crate::config::PROMPT;

/// Work handed to the device once a line is complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted<'a> {
    Command(Command<'a>),
    Shortcut(Shortcut),
    /// First token is not a command; already reported on the console
    NotFound,
}

/// Turns serial bytes into commands
///
/// Echoes every accepted byte, prompts after each line and prints the
/// report for unknown commands. A line that yields a [`Submitted`] item must
/// be finished with [`Dispatcher::finish`] once the item has run.
#[derive(Debug, Default)]
pub struct Dispatcher {
    line: LineBuffer,
}

impl Dispatcher {
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Feed one byte from the serial link
    pub fn feed<W: Write>(&mut self, byte: u8, out: &mut W) -> Option<Submitted<'_>> {
        let event = self.line.push(byte);
        if event == LineEvent::Discarded {
            return None;
        }
        let _ = out.write_char(byte as char);
        if event == LineEvent::Edited {
            return None;
        }

        let _ = out.write_char('\n');
        if self.line.is_empty() {
            let _ = out.write_str(PROMPT);
            return None;
        }

        match parse_line(self.line.as_str()) {
            Parsed::Empty => {}
            Parsed::NotFound(name) => {
                let _ = writeln!(out, "Command \"{}\" not found", name);
                return Some(Submitted::NotFound);
            }
            Parsed::Shortcut(_) | Parsed::Command(_) => return self.submitted(),
        }
        self.finish(out);
        None
    }

    fn submitted(&self) -> Option<Submitted<'_>> {
        match parse_line(self.line.as_str()) {
            Parsed::Shortcut(shortcut) => Some(Submitted::Shortcut(shortcut)),
            Parsed::Command(command) => Some(Submitted::Command(command)),
            Parsed::Empty | Parsed::NotFound(_) => None,
        }
    }

    /// Reset the line and prompt for the next one
    pub fn finish<W: Write>(&mut self, out: &mut W) {
        self.line.clear();
        let _ = write!(out, "\n{}", PROMPT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LINE_CAPACITY;

    fn type_line(d: &mut Dispatcher, text: &str, out: &mut String) -> Option<String> {
        for b in text.bytes() {
            assert!(d.feed(b, out).is_none());
        }
        let submitted = d.feed(b'\r', out).map(|s| format!("{:?}", s));
        if submitted.is_some() {
            d.finish(out);
        }
        submitted
    }

    #[test]
    fn test_echo_and_dispatch() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        let submitted = type_line(&mut d, "mount 0:", &mut out);
        assert_eq!(
            submitted.as_deref(),
            Some("Command(Mount(Some(\"0:\")))")
        );
        assert_eq!(out, "mount 0:\r\n\n> ");
        assert!(d.line().is_empty());
    }

    #[test]
    fn test_empty_line_reprompts() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        assert!(d.feed(b'\r', &mut out).is_none());
        assert_eq!(out, "\r\n> ");
    }

    #[test]
    fn test_blank_line_clears_without_report() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        assert!(type_line(&mut d, "   ", &mut out).is_none());
        assert_eq!(out, "   \r\n\n> ");
        assert!(d.line().is_empty());
    }

    #[test]
    fn test_unknown_command_reported() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        assert_eq!(
            type_line(&mut d, "frobnicate now", &mut out).as_deref(),
            Some("NotFound")
        );
        assert!(out.contains("Command \"frobnicate\" not found\n"));
        assert!(out.ends_with("\n> "));
        assert!(d.line().is_empty());
    }

    #[test]
    fn test_discarded_bytes_not_echoed() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        d.feed(0x1b, &mut out);
        d.feed(0x00, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_backspace_echoed() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        d.feed(b'x', &mut out);
        d.feed(0x08, &mut out);
        assert_eq!(out, "x\u{8}");
        assert!(d.line().is_empty());
    }

    #[test]
    fn test_shortcut_line() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        assert_eq!(
            type_line(&mut d, "f", &mut out).as_deref(),
            Some("Shortcut(Capture)")
        );
    }

    #[test]
    fn test_overlong_line_truncated() {
        let mut d = Dispatcher::new();
        let mut out = String::new();
        let long = "z".repeat(LINE_CAPACITY * 2);
        assert_eq!(type_line(&mut d, &long, &mut out).as_deref(), Some("NotFound"));
        let expected = format!("Command \"{}\" not found", "z".repeat(LINE_CAPACITY - 1));
        assert!(out.contains(&expected));
    }
}
