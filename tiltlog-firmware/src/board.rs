//! Board wiring
//!
//! Pin map of the logger board:
//!
//! | Function            | Pins                                   |
//! |---------------------|----------------------------------------|
//! | Console (UART1)     | TX GPIO8, RX GPIO9, 115200 baud        |
//! | MPU6050 (I2C0)      | SDA GPIO0, SCL GPIO1, 400 kHz          |
//! | SSD1306 (I2C1)      | SDA GPIO14, SCL GPIO15, 400 kHz        |
//! | SD card (SPI0)      | SCK GPIO18, MOSI GPIO19, MISO GPIO16, CS GPIO17 |
//! | RGB LED             | R GPIO13, G GPIO11, B GPIO12           |
//! | Buttons (pull-up)   | A GPIO5, B GPIO6                       |
//! | Buzzers (PWM)       | GPIO10 (slice 5 A), GPIO21 (slice 2 B) |

use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking as I2cBlocking, I2c};
use embassy_rp::peripherals::{I2C0, I2C1, SPI0};
use embassy_rp::spi::{Blocking as SpiBlocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_sdmmc::{Block, BlockCount, BlockDevice, BlockIdx, SdCard, SdCardError};
use tiltlog_core::device::Board;
use tiltlog_drivers::buzzer::ToneBuzzer;
use tiltlog_drivers::display::Ssd1306;
use tiltlog_drivers::indicator::RgbLed;
use tiltlog_drivers::sensor::Mpu6050;
use tiltlog_drivers::storage::{Removable, SdStorage};

use crate::clock::{EmbassyClock, SharedRtc};
use crate::tone::PwmPair;

pub const CONSOLE_BAUD: u32 = 115_200;
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// SPI clock while the card is identified
pub const SD_INIT_HZ: u32 = 400_000;
/// SPI clock once the card answered
pub const SD_RUN_HZ: u32 = 12_500_000;

/// Time for the host to open the serial terminal before the banner
pub const STARTUP_DELAY_MS: u64 = 5_000;

pub type SensorBus = I2c<'static, I2C0, I2cBlocking>;
pub type DisplayBus = I2c<'static, I2C1, I2cBlocking>;
pub type CardBus = ExclusiveDevice<Spi<'static, SPI0, SpiBlocking>, Output<'static>, Delay>;
pub type Card = SdCard<CardBus, Delay>;

/// Shared handle to the card
///
/// The volume manager is rebuilt on format, so it needs a device it can
/// clone; every clone talks to the same card.
#[derive(Clone, Copy)]
pub struct CardRef(&'static Card);

impl CardRef {
    pub fn new(card: &'static Card) -> Self {
        Self(card)
    }
}

impl BlockDevice for CardRef {
    type Error = SdCardError;

    fn read(&self, blocks: &mut [Block], start_block_idx: BlockIdx) -> Result<(), Self::Error> {
        self.0.read(blocks, start_block_idx)
    }

    fn write(&self, blocks: &[Block], start_block_idx: BlockIdx) -> Result<(), Self::Error> {
        self.0.write(blocks, start_block_idx)
    }

    fn num_blocks(&self) -> Result<BlockCount, Self::Error> {
        self.0.num_blocks()
    }
}

/// The card is identified again at the slow clock after the last unmount;
/// the fast clock comes back once a volume opens.
impl Removable for CardRef {
    fn mark_uninit(&self) {
        self.0.spi(|dev| dev.bus_mut().set_frequency(SD_INIT_HZ));
        self.0.mark_card_uninit();
    }

    fn mark_ready(&self) {
        self.0.spi(|dev| dev.bus_mut().set_frequency(SD_RUN_HZ));
    }
}

/// RP2040 logger board
pub struct RpBoard;

impl Board for RpBoard {
    type Storage = SdStorage<CardRef, SharedRtc>;
    type Sensor = Mpu6050<SensorBus, Delay>;
    type Light = RgbLed<Output<'static>, Output<'static>, Output<'static>>;
    type Buzzer = ToneBuzzer<PwmPair, Delay>;
    type Display = Ssd1306<DisplayBus>;
    type Clock = EmbassyClock;
    type Rtc = SharedRtc;
}
