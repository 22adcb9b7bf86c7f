//! Buzzer square wave on two PWM slices

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use fixed::types::U12F4;
use tiltlog_drivers::buzzer::{PwmTone, ToneOutput};

/// Both buzzers, driven with the same tone
pub struct PwmPair {
    first: Pwm<'static>,
    second: Pwm<'static>,
}

impl PwmPair {
    /// `first` drives channel A of its slice, `second` channel B
    pub fn new(first: Pwm<'static>, second: Pwm<'static>) -> Self {
        Self { first, second }
    }

    fn apply(&mut self, config: &Config) {
        self.first.set_config(config);
        self.second.set_config(config);
    }
}

impl ToneOutput for PwmPair {
    fn start(&mut self, freq_hz: u32) {
        let Some(tone) = PwmTone::for_frequency(clk_sys_freq(), freq_hz) else {
            self.stop();
            return;
        };
        let mut config = Config::default();
        config.divider = U12F4::from_num(tone.divider);
        config.top = tone.top;
        config.compare_a = tone.level;
        config.compare_b = tone.level;
        self.apply(&config);
    }

    fn stop(&mut self) {
        // Compare 0 holds both outputs low
        self.apply(&Config::default());
    }
}
