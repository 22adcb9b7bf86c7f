//! Button edge task
//!
//! Waits for a falling edge on either button, debounces it and raises the
//! matching flag for the logger loop.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_time::Instant;
use tiltlog_core::input::{Button, Debouncer};

use crate::channels::BUTTONS;

#[embassy_executor::task]
pub async fn buttons_task(mut button_a: Input<'static>, mut button_b: Input<'static>, debounce_ms: u32) {
    info!("Button task started");

    let mut debounce_a = Debouncer::new(debounce_ms);
    let mut debounce_b = Debouncer::new(debounce_ms);

    loop {
        let button = match select(button_a.wait_for_falling_edge(), button_b.wait_for_falling_edge()).await {
            Either::First(()) => Button::A,
            Either::Second(()) => Button::B,
        };

        let debouncer = match button {
            Button::A => &mut debounce_a,
            Button::B => &mut debounce_b,
        };
        if debouncer.accept(Instant::now().as_micros()) {
            debug!("Button {} pressed", button);
            BUTTONS.raise(button);
        } else {
            trace!("Button {} bounce ignored", button);
        }
    }
}
