//! Tilt angles from the accelerometer and yaw from the gyroscope

use core::f32::consts::PI;

use libm::{atan2f, floor, sqrtf};

use crate::config::{ACCEL_COUNTS_PER_G, GYRO_COUNTS_PER_DPS};

const RAD_TO_DEG: f32 = 180.0 / PI;

/// Convert raw accelerometer counts to multiples of g
pub fn normalize_accel(raw: [i16; 3]) -> [f32; 3] {
    raw.map(|v| v as f32 / ACCEL_COUNTS_PER_G)
}

/// Roll and pitch in degrees from a gravity vector in g
pub fn tilt_angles(accel: [f32; 3]) -> (f32, f32) {
    let [ax, ay, az] = accel;
    let roll = atan2f(ay, az) * RAD_TO_DEG;
    let pitch = atan2f(-ax, sqrtf(ay * ay + az * az)) * RAD_TO_DEG;
    (roll, pitch)
}

/// Bring an angle into [-180, 180)
///
/// One 360° step covers any single integration step of the sensor's full
/// rate range within a second; larger excursions are folded completely.
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle;
    if a >= 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    if !(-180.0..180.0).contains(&a) {
        let wide = a as f64;
        a = (wide - 360.0 * floor((wide + 180.0) / 360.0)) as f32;
        if a >= 180.0 {
            a -= 360.0;
        }
    }
    a
}

/// Integrates the z angular rate into a yaw angle
///
/// The first update only seeds the timestamp, so it contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct YawIntegrator {
    yaw: f32,
    previous_us: Option<u64>,
}

impl YawIntegrator {
    pub const fn new() -> Self {
        Self {
            yaw: 0.0,
            previous_us: None,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Add one gyroscope reading taken at `now_us`, returning the new yaw
    pub fn update(&mut self, gz_raw: i16, now_us: u64) -> f32 {
        let dt = match self.previous_us {
            Some(previous) => now_us.saturating_sub(previous) as f32 / 1_000_000.0,
            None => 0.0,
        };
        self.previous_us = Some(now_us);

        let rate = gz_raw as f32 / GYRO_COUNTS_PER_DPS;
        self.yaw = wrap_degrees(self.yaw + rate * dt);
        self.yaw
    }
}
