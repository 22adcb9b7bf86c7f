//! PWM buzzer
//!
//! A [`ToneOutput`] is whatever can start and stop a square wave on the
//! buzzer pins; [`ToneBuzzer`] sequences the beeps with a blocking delay.
//! [`PwmTone`] computes the counter settings for a PWM slice clocked from
//! the system clock, with a duty cycle of one sixth.

use embedded_hal::delay::DelayNs;
use tiltlog_core::traits::Buzzer;

/// Largest integer clock divider of a PWM slice
const MAX_DIVIDER: u32 = 255;

/// Counter settings for one tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTone {
    /// Integer clock divider, 1..=255
    pub divider: u8,
    /// Counter wrap value; the period is `top + 1` divided ticks
    pub top: u16,
    /// Compare level for the output channel
    pub level: u16,
}

impl PwmTone {
    /// Settings for `freq_hz` from a `clock_hz` slice clock
    ///
    /// Returns `None` for 0 Hz or frequencies the slice cannot reach.
    pub fn for_frequency(clock_hz: u32, freq_hz: u32) -> Option<Self> {
        if freq_hz == 0 || freq_hz > clock_hz / 2 {
            return None;
        }
        let ticks = clock_hz / freq_hz;
        let divider = ticks.div_ceil(u16::MAX as u32 + 1).max(1);
        if divider > MAX_DIVIDER {
            return None;
        }
        let period = ticks / divider;
        Some(Self {
            divider: divider as u8,
            top: (period - 1) as u16,
            level: (period / 6) as u16,
        })
    }
}

/// Square wave generator on the buzzer pins
pub trait ToneOutput {
    /// Start sounding `freq_hz`
    fn start(&mut self, freq_hz: u32);

    /// Silence the output and leave the pins low
    fn stop(&mut self);
}

/// Blocking beeper
pub struct ToneBuzzer<T, D> {
    tone: T,
    delay: D,
}

impl<T: ToneOutput, D: DelayNs> ToneBuzzer<T, D> {
    pub fn new(mut tone: T, delay: D) -> Self {
        tone.stop();
        Self { tone, delay }
    }
}

impl<T: ToneOutput, D: DelayNs> Buzzer for ToneBuzzer<T, D> {
    fn beep(&mut self, freq_hz: u32, duration_ms: u32, repeat: u8) {
        for _ in 0..repeat {
            self.tone.start(freq_hz);
            self.delay.delay_ms(duration_ms);
            self.tone.stop();
            self.delay.delay_ms(duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Event {
        Start(u32),
        Stop,
        Delay(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct FakeTone(Log);

    impl ToneOutput for FakeTone {
        fn start(&mut self, freq_hz: u32) {
            self.0.borrow_mut().push(Event::Start(freq_hz));
        }

        fn stop(&mut self) {
            self.0.borrow_mut().push(Event::Stop);
        }
    }

    struct FakeDelay(Log);

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Delay(ns / 1_000_000));
        }
    }

    #[test]
    fn test_beep_sequence() {
        let log: Log = Rc::default();
        let mut buzzer = ToneBuzzer::new(FakeTone(log.clone()), FakeDelay(log.clone()));
        log.borrow_mut().clear();

        buzzer.beep(4000, 50, 2);
        assert_eq!(
            *log.borrow(),
            [
                Event::Start(4000),
                Event::Delay(50),
                Event::Stop,
                Event::Delay(50),
                Event::Start(4000),
                Event::Delay(50),
                Event::Stop,
                Event::Delay(50),
            ]
        );
    }

    #[test]
    fn test_new_silences() {
        let log: Log = Rc::default();
        let _buzzer = ToneBuzzer::new(FakeTone(log.clone()), FakeDelay(log.clone()));
        assert_eq!(*log.borrow(), [Event::Stop]);
    }

    #[test]
    fn test_zero_repeat_is_silent() {
        let log: Log = Rc::default();
        let mut buzzer = ToneBuzzer::new(FakeTone(log.clone()), FakeDelay(log.clone()));
        buzzer.beep(6000, 150, 0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_pwm_tone_undivided() {
        // 125 MHz / 4 kHz = 31250 ticks
        let tone = PwmTone::for_frequency(125_000_000, 4000).unwrap();
        assert_eq!(
            tone,
            PwmTone {
                divider: 1,
                top: 31249,
                level: 5208,
            }
        );

        let tone = PwmTone::for_frequency(125_000_000, 6000).unwrap();
        assert_eq!(tone.top, 20832);
        assert_eq!(tone.level, 3472);
    }

    #[test]
    fn test_pwm_tone_divided() {
        // 125 MHz / 440 Hz = 284090 ticks, needs a divider of 5
        let tone = PwmTone::for_frequency(125_000_000, 440).unwrap();
        assert_eq!(tone.divider, 5);
        assert_eq!(tone.top, 56817);
    }

    #[test]
    fn test_pwm_tone_out_of_range() {
        assert_eq!(PwmTone::for_frequency(125_000_000, 0), None);
        assert_eq!(PwmTone::for_frequency(125_000_000, 1), None);
        assert_eq!(PwmTone::for_frequency(125_000_000, 70_000_000), None);
    }
}
