//! Fixed capacity line editor

use heapless::Vec;

use crate::config::LINE_CAPACITY;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const CARRIAGE_RETURN: u8 = b'\r';

/// What a byte did to the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Control byte that is neither whitespace nor an editing key; not echoed
    Discarded,
    /// Byte accepted and echoed (stored, erased, or dropped because full)
    Edited,
    /// Carriage return; the line is ready to be read
    Submitted,
}

/// Current serial input line
///
/// Holds at most `LINE_CAPACITY - 1` bytes, keeping the last slot for the
/// terminator of the wire format. Bytes past that limit are dropped.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buf: Vec<u8, LINE_CAPACITY>,
}

/// Printable ASCII or whitespace, as accepted by the console
fn is_accepted(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e | b'\t' | b'\n' | 0x0b | 0x0c | CARRIAGE_RETURN | BACKSPACE | DELETE)
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Maximum number of stored bytes
    pub const fn max_len() -> usize {
        LINE_CAPACITY - 1
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Feed one byte
    pub fn push(&mut self, byte: u8) -> LineEvent {
        if !is_accepted(byte) {
            return LineEvent::Discarded;
        }
        match byte {
            CARRIAGE_RETURN => LineEvent::Submitted,
            BACKSPACE | DELETE => {
                self.buf.pop();
                LineEvent::Edited
            }
            _ => {
                if self.buf.len() < Self::max_len() {
                    // Cannot fail, length checked above
                    let _ = self.buf.push(byte);
                }
                LineEvent::Edited
            }
        }
    }

    /// Line content; only ASCII is ever stored
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf).unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed(line: &mut LineBuffer, text: &str) {
        for b in text.bytes() {
            line.push(b);
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut line = LineBuffer::new();
        feed(&mut line, "mount 0:");
        assert_eq!(line.as_str(), "mount 0:");
        assert_eq!(line.push(b'\r'), LineEvent::Submitted);
        // Carriage return is not stored
        assert_eq!(line.as_str(), "mount 0:");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut line = LineBuffer::new();
        feed(&mut line, "lsx");
        assert_eq!(line.push(BACKSPACE), LineEvent::Edited);
        assert_eq!(line.as_str(), "ls");
        line.push(DELETE);
        assert_eq!(line.as_str(), "l");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut line = LineBuffer::new();
        assert_eq!(line.push(BACKSPACE), LineEvent::Edited);
        assert_eq!(line.push(DELETE), LineEvent::Edited);
        assert!(line.is_empty());
        feed(&mut line, "ab");
        assert_eq!(line.as_str(), "ab");
    }

    #[test]
    fn test_control_bytes_discarded() {
        let mut line = LineBuffer::new();
        assert_eq!(line.push(0x00), LineEvent::Discarded);
        assert_eq!(line.push(0x1b), LineEvent::Discarded);
        assert_eq!(line.push(0x80), LineEvent::Discarded);
        assert_eq!(line.push(0xff), LineEvent::Discarded);
        assert!(line.is_empty());
    }

    #[test]
    fn test_whitespace_stored() {
        let mut line = LineBuffer::new();
        assert_eq!(line.push(b'\t'), LineEvent::Edited);
        assert_eq!(line.push(b'\n'), LineEvent::Edited);
        assert_eq!(line.as_str(), "\t\n");
    }

    #[test]
    fn test_overflow_dropped_silently() {
        let mut line = LineBuffer::new();
        for _ in 0..LINE_CAPACITY {
            assert_eq!(line.push(b'x'), LineEvent::Edited);
        }
        assert_eq!(line.len(), LINE_CAPACITY - 1);
        line.push(b'y');
        assert!(!line.as_str().contains('y'));
        // Editing still works at the limit
        line.push(BACKSPACE);
        line.push(b'z');
        assert!(line.as_str().ends_with('z'));
        assert_eq!(line.len(), LINE_CAPACITY - 1);
    }

    proptest! {
        #[test]
        fn prop_length_bounded(bytes in proptest::collection::vec(any::<u8>(), 0..600)) {
            let mut line = LineBuffer::new();
            let mut expected: usize = 0;
            for b in bytes {
                let event = line.push(b);
                match b {
                    BACKSPACE | DELETE => expected = expected.saturating_sub(1),
                    b'\r' => {}
                    _ if event == LineEvent::Edited => {
                        expected = (expected + 1).min(LINE_CAPACITY - 1)
                    }
                    _ => {}
                }
                prop_assert!(line.len() <= LINE_CAPACITY - 1);
                prop_assert_eq!(line.len(), expected);
                prop_assert!(core::str::from_utf8(line.as_str().as_bytes()).is_ok());
            }
        }
    }
}
