//! MPU6050 6-axis inertial sensor (I2C)
//!
//! The device comes out of power-on reset asleep. [`ImuSensor::reset`]
//! issues a full device reset, clears the sleep bit and checks the identity
//! register. Measurements are read as three bursts of big-endian 16-bit
//! registers: acceleration, angular rate, then temperature.
//!
//! Full-scale ranges are left at the reset defaults (±2 g, ±250 °/s).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tiltlog_core::traits::{ImuSensor, RawSample, SensorError};

/// I2C address with AD0 tied low
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Expected WHO_AM_I value
pub const DEVICE_ID: u8 = 0x68;

/// MPU6050 register addresses
pub mod reg {
    /// First of six acceleration bytes (x, y, z high/low)
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    /// Temperature high/low
    pub const TEMP_OUT_H: u8 = 0x41;
    /// First of six angular rate bytes (x, y, z high/low)
    pub const GYRO_XOUT_H: u8 = 0x43;
    /// Power management 1 (reset, sleep, clock source)
    pub const PWR_MGMT_1: u8 = 0x6B;
    /// Identity register
    pub const WHO_AM_I: u8 = 0x75;
}

/// PWR_MGMT_1 device reset bit
const DEVICE_RESET: u8 = 0x80;

/// Time for the reset to complete
const RESET_DELAY_MS: u32 = 100;

/// Time for the oscillator to settle after wake-up
const WAKE_DELAY_MS: u32 = 10;

/// MPU6050 on a blocking I2C bus
pub struct Mpu6050<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Mpu6050<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Use the alternate address (AD0 high is 0x69)
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Give back the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Read the identity register
    pub fn who_am_i(&mut self) -> Result<u8, SensorError> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg::WHO_AM_I], &mut id)
            .map_err(|_| SensorError::Bus)?;
        Ok(id[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorError::Bus)
    }

    fn read_triplet(&mut self, first: u8) -> Result<[i16; 3], SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[first], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }
}

impl<I2C: I2c, D: DelayNs> ImuSensor for Mpu6050<I2C, D> {
    fn reset(&mut self) -> Result<(), SensorError> {
        self.write_register(reg::PWR_MGMT_1, DEVICE_RESET)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.write_register(reg::PWR_MGMT_1, 0x00)?;
        self.delay.delay_ms(WAKE_DELAY_MS);

        if self.who_am_i()? != DEVICE_ID {
            return Err(SensorError::WrongDevice);
        }
        Ok(())
    }

    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let accel = self.read_triplet(reg::ACCEL_XOUT_H)?;
        let gyro = self.read_triplet(reg::GYRO_XOUT_H)?;

        let mut temp = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg::TEMP_OUT_H], &mut temp)
            .map_err(|_| SensorError::Bus)?;

        Ok(RawSample {
            accel,
            gyro,
            temp: i16::from_be_bytes(temp),
        })
    }
}
