//! Logger run loop
//!
//! Owns the device. Every iteration drains the console receive buffer
//! into the line editor, then services pending buttons, logs any display
//! fault and sleeps for the loop period. Commands run to completion inside the loop.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::Timer;
use tiltlog_core::{Logger, SystemRequest};
use tiltlog_drivers::console::{SerialReader, SerialWriter};

use crate::board::RpBoard;
use crate::channels::BUTTONS;

pub type ConsoleRx = SerialReader<BufferedUartRx>;
pub type ConsoleTx = SerialWriter<BufferedUartTx>;

#[embassy_executor::task]
pub async fn logger_task(mut logger: Logger<RpBoard>, mut rx: ConsoleRx, mut tx: ConsoleTx) {
    info!("Logger task started");

    if let Err(e) = logger.boot(&mut tx) {
        warn!("Boot reported {}", e);
    }

    let period_ms = logger.device().state().config.loop_period_ms;

    loop {
        while let Some(byte) = rx.read_byte() {
            match logger.feed(byte, &mut tx) {
                Some(Ok(())) => debug!("Command completed"),
                Some(Err(e)) => warn!("Command failed: {}", e),
                None => {}
            }
        }

        if let Some(SystemRequest::EnterBootloader) = logger.service_buttons(&BUTTONS, &mut tx) {
            warn!("Restarting into the USB bootloader");
            let _ = tx.flush();
            enter_bootloader();
        }

        if let Some(e) = logger.device_mut().take_display_fault() {
            warn!("Display fault: {}", e);
        }

        Timer::after_millis(period_ms.into()).await;
    }
}

fn enter_bootloader() -> ! {
    embassy_rp::rom_data::reset_to_usb_boot(0, 0);
    loop {
        cortex_m::asm::wfi();
    }
}
