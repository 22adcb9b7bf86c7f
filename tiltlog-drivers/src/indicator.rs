//! RGB status LED on three GPIO outputs
//!
//! Each channel is either fully on or off, giving the seven mixed colours
//! of [`Color`]. Common-anode parts drive the pins inverted.

use embedded_hal::digital::OutputPin;
use tiltlog_core::traits::{Color, Indicator};

/// Three-channel LED
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// If true, a channel is lit when its pin is LOW
    inverted: bool,
    color: Color,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbLed<R, G, B> {
    /// Create the LED and switch it off
    pub fn new(red: R, green: G, blue: B, inverted: bool) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            inverted,
            color: Color::Off,
        };
        led.set_color(Color::Off);
        led
    }

    /// Common-cathode LED, lit on HIGH
    pub fn common_cathode(red: R, green: G, blue: B) -> Self {
        Self::new(red, green, blue, false)
    }

    /// Colour currently shown
    pub fn color(&self) -> Color {
        self.color
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) {
    // GPIO writes on the supported HALs are infallible
    let _ = if high { pin.set_high() } else { pin.set_low() };
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Indicator for RgbLed<R, G, B> {
    fn set_color(&mut self, color: Color) {
        let (r, g, b) = color.channels();
        drive(&mut self.red, r != self.inverted);
        drive(&mut self.green, g != self.inverted);
        drive(&mut self.blue, b != self.inverted);
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakePin(Rc<Cell<bool>>);

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.set(true);
            Ok(())
        }
    }

    fn pins() -> (FakePin, FakePin, FakePin) {
        (FakePin::default(), FakePin::default(), FakePin::default())
    }

    fn levels(r: &FakePin, g: &FakePin, b: &FakePin) -> (bool, bool, bool) {
        (r.0.get(), g.0.get(), b.0.get())
    }

    #[test]
    fn test_common_cathode_colors() {
        let (r, g, b) = pins();
        let mut led = RgbLed::common_cathode(r.clone(), g.clone(), b.clone());
        assert_eq!(levels(&r, &g, &b), (false, false, false));

        led.set_color(Color::Yellow);
        assert_eq!(levels(&r, &g, &b), (true, true, false));
        assert_eq!(led.color(), Color::Yellow);

        led.set_color(Color::Blue);
        assert_eq!(levels(&r, &g, &b), (false, false, true));
    }

    #[test]
    fn test_inverted_starts_dark() {
        let (r, g, b) = pins();
        let mut led = RgbLed::new(r.clone(), g.clone(), b.clone(), true);
        assert_eq!(levels(&r, &g, &b), (true, true, true));

        led.set_color(Color::Magenta);
        assert_eq!(levels(&r, &g, &b), (false, true, false));
    }
}
