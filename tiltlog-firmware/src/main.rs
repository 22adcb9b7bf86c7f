//! Tiltlog - SD card inclination logger firmware
//!
//! Main firmware binary for RP2040 boards carrying an MPU6050, an SD card
//! socket, an SSD1306 status display, an RGB LED, two buzzers and two
//! buttons. The device is driven from a serial console on UART1.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART1;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::rtc::{self, Rtc};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::SdCard;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tiltlog_core::config::LoggerConfig;
use tiltlog_core::device::Peripherals;
use tiltlog_core::Logger;
use tiltlog_drivers::buzzer::ToneBuzzer;
use tiltlog_drivers::console::{SerialReader, SerialWriter};
use tiltlog_drivers::display::Ssd1306;
use tiltlog_drivers::indicator::RgbLed;
use tiltlog_drivers::sensor::Mpu6050;
use tiltlog_drivers::storage::SdStorage;

use crate::board::{Card, CardRef, RpBoard};
use crate::clock::{EmbassyClock, SharedRtc};
use crate::tone::PwmPair;

mod board;
mod channels;
mod clock;
mod tasks;
mod tone;

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
    RTC_IRQ => rtc::InterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static CARD: StaticCell<Card> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tiltlog firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = LoggerConfig::default();
    let debounce_ms = config.debounce_ms;

    // Console on UART1 (GPIO8 TX, GPIO9 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::CONSOLE_BAUD;
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let (tx, rx) = uart.into_buffered(Irqs, tx_buf, rx_buf).split();
    let console_rx = SerialReader::new(rx);
    let console_tx = SerialWriter::new(tx);

    // MPU6050 on I2C0, reset during boot
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = board::I2C_FREQUENCY_HZ;
    let sensor_bus = I2c::new_blocking(p.I2C0, p.PIN_1, p.PIN_0, i2c_config.clone());
    let sensor = Mpu6050::new(sensor_bus, Delay);

    // Status display on I2C1
    let display_bus = I2c::new_blocking(p.I2C1, p.PIN_15, p.PIN_14, i2c_config);
    let mut display = Ssd1306::new(display_bus);
    match display.init() {
        Ok(()) => info!("Display initialized"),
        Err(e) => warn!("Display init failed: {}", e),
    }

    // SD card on SPI0, identified at low speed
    let mut spi_config = spi::Config::default();
    spi_config.frequency = board::SD_INIT_HZ;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let card_bus = ExclusiveDevice::new(spi, cs, Delay).unwrap();
    let card: &'static Card = CARD.init(SdCard::new(card_bus, Delay));
    match card.num_bytes() {
        Ok(bytes) => {
            info!("SD card: {} bytes", bytes);
            card.spi(|dev| dev.bus_mut().set_frequency(board::SD_RUN_HZ));
        }
        Err(e) => warn!("SD card not ready: {}", Debug2Format(&e)),
    }

    let rtc = SharedRtc::install(Rtc::new(p.RTC, Irqs));
    let storage = SdStorage::new(CardRef::new(card), rtc);

    let light = RgbLed::common_cathode(
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
    );

    let tone = PwmPair::new(
        Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, pwm::Config::default()),
        Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, pwm::Config::default()),
    );
    let buzzer = ToneBuzzer::new(tone, Delay);

    let button_a = Input::new(p.PIN_5, Pull::Up);
    let button_b = Input::new(p.PIN_6, Pull::Up);

    let logger = Logger::new(
        config,
        Peripherals::<RpBoard> {
            storage,
            sensor,
            light,
            buzzer,
            display,
            clock: EmbassyClock,
            rtc,
        },
    );

    // Give the host time to open the serial terminal
    Timer::after_millis(board::STARTUP_DELAY_MS).await;

    spawner.spawn(tasks::buttons_task(button_a, button_b, debounce_ms)).unwrap();
    spawner.spawn(tasks::logger_task(logger, console_rx, console_tx)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
