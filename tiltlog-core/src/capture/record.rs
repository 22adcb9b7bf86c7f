//! One CSV line of the capture file

use core::fmt;

use heapless::String;

use super::orientation::{normalize_accel, tilt_angles};
use crate::traits::RawSample;

/// Longest formatted record, newline included, with room to spare
pub const RECORD_CAPACITY: usize = 80;

/// Derived values for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleRecord {
    /// 1-based sample number
    pub index: u16,
    /// Acceleration in g
    pub accel: [f32; 3],
    /// Degrees
    pub roll: f32,
    /// Degrees
    pub pitch: f32,
    /// Degrees in [-180, 180)
    pub yaw: f32,
}

impl SampleRecord {
    /// Derive roll and pitch from a raw sample; yaw comes from the integrator
    pub fn from_raw(index: u16, raw: &RawSample, yaw: f32) -> Self {
        let accel = normalize_accel(raw.accel);
        let (roll, pitch) = tilt_angles(accel);
        Self {
            index,
            accel,
            roll,
            pitch,
            yaw,
        }
    }

    /// Format the record as a CSV line
    pub fn to_line(&self) -> Result<String<RECORD_CAPACITY>, fmt::Error> {
        let mut line = String::new();
        fmt::Write::write_fmt(&mut line, format_args!("{}", self))?;
        Ok(line)
    }
}

impl SampleRecord {
    /// Yaw as printed; values that would round up to 180.00 are shown as -180
    fn printed_yaw(&self) -> f32 {
        if self.yaw >= YAW_ROUNDS_TO_180 {
            -180.0
        } else {
            self.yaw
        }
    }
}

const YAW_ROUNDS_TO_180: f32 = 179.995;

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [ax, ay, az] = self.accel;
        writeln!(
            f,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            self.index,
            ax,
            ay,
            az,
            self.roll,
            self.pitch,
            self.printed_yaw()
        )
    }
}
