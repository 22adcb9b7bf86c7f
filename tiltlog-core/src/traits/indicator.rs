//! Indicator light and buzzer traits

/// Indicator colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    /// Channel states as (red, green, blue)
    pub fn channels(&self) -> (bool, bool, bool) {
        match self {
            Color::Off => (false, false, false),
            Color::Red => (true, false, false),
            Color::Green => (false, true, false),
            Color::Blue => (false, false, true),
            Color::Yellow => (true, true, false),
            Color::Cyan => (false, true, true),
            Color::Magenta => (true, false, true),
            Color::White => (true, true, true),
        }
    }
}

/// Tri-colour status light
pub trait Indicator {
    fn set_color(&mut self, color: Color);
}

/// Blocking tone generator
pub trait Buzzer {
    /// Sound `repeat` beeps of `duration_ms`, separated by equal silences
    fn beep(&mut self, freq_hz: u32, duration_ms: u32, repeat: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_colors() {
        assert_eq!(Color::Yellow.channels(), (true, true, false));
        assert_eq!(Color::Magenta.channels(), (true, false, true));
        assert_eq!(Color::Off.channels(), (false, false, false));
    }
}
