//! Inertial sensor trait

/// Errors that can occur while talking to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss)
    Bus,
    /// Device identity register did not match
    WrongDevice,
}

/// One raw register snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Acceleration x, y, z in sensor counts
    pub accel: [i16; 3],
    /// Angular rate x, y, z in sensor counts
    pub gyro: [i16; 3],
    /// Die temperature in sensor counts
    pub temp: i16,
}

/// 6-axis inertial sensor
pub trait ImuSensor {
    /// Reset the device and wake it up
    fn reset(&mut self) -> Result<(), SensorError>;

    /// Read acceleration, angular rate and temperature
    fn read_raw(&mut self) -> Result<RawSample, SensorError>;
}
