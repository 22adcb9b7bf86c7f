//! Configuration constants and types
//!
//! Values that are fixed by the hardware or by the file format live here as
//! constants. Everything a board may want to change is collected in
//! [`LoggerConfig`].

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serial command line capacity in bytes, terminator slot included
pub const LINE_CAPACITY: usize = 256;

/// Maximum number of configured logical volumes
pub const MAX_VOLUMES: usize = 4;

/// Maximum length of a volume name
pub const MAX_VOLUME_NAME_LEN: usize = 8;

/// Maximum length of a path handled by the console commands
pub const MAX_PATH_LEN: usize = 64;

/// Samples written per capture session
pub const SAMPLES_PER_CAPTURE: u16 = 128;

/// Raw accelerometer counts per g (±2 g full scale)
pub const ACCEL_COUNTS_PER_G: f32 = 16384.0;

/// Raw gyroscope counts per °/s (±250 °/s full scale)
pub const GYRO_COUNTS_PER_DPS: f32 = 131.0;

/// Delay between two capture samples
pub const SAMPLE_PERIOD_MS: u32 = 50;

/// Edges on the same button closer than this are discarded
pub const DEBOUNCE_MS: u32 = 200;

/// Sleep between two run loop iterations
pub const LOOP_PERIOD_MS: u32 = 500;

/// CSV header written at the top of every capture file
pub const CAPTURE_HEADER: &str = "numero_amostra,accel_x,accel_y,accel_z,giro_x,giro_y,giro_z\n";

/// Default capture file name (8.3 short name)
pub const DEFAULT_CAPTURE_FILE: &str = "IMU_DATA.CSV";

/// Default name of the first card slot
pub const DEFAULT_VOLUME: &str = "0:";

/// Console prompt
pub const PROMPT: &str = "> ";

/// Blink pattern used for every failure and for completed listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlinkPattern {
    /// Number of on/off cycles
    pub times: u8,
    /// Half period in milliseconds
    pub period_ms: u32,
}

impl BlinkPattern {
    pub const STANDARD: Self = Self {
        times: 25,
        period_ms: 50,
    };
}

/// Buzzer tone pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeepPattern {
    pub freq_hz: u32,
    pub duration_ms: u32,
    pub repeat: u8,
}

impl BeepPattern {
    /// Volume mounted
    pub const MOUNTED: Self = Self {
        freq_hz: 4000,
        duration_ms: 50,
        repeat: 2,
    };
    /// Volume unmounted
    pub const UNMOUNTED: Self = Self {
        freq_hz: 4000,
        duration_ms: 50,
        repeat: 4,
    };
    /// Capture started
    pub const CAPTURE_STARTED: Self = Self {
        freq_hz: 6000,
        duration_ms: 150,
        repeat: 1,
    };
    /// Capture finished
    pub const CAPTURE_FINISHED: Self = Self {
        freq_hz: 6000,
        duration_ms: 150,
        repeat: 2,
    };
}

/// Capture pipeline parameters
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureConfig {
    /// Output file, created or truncated on every capture
    pub file_name: String<MAX_PATH_LEN>,
    /// Number of samples per session
    pub samples: u16,
    /// Pause after every sample
    pub sample_period_ms: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let mut file_name = String::new();
        let _ = file_name.push_str(DEFAULT_CAPTURE_FILE);
        Self {
            file_name,
            samples: SAMPLES_PER_CAPTURE,
            sample_period_ms: SAMPLE_PERIOD_MS,
        }
    }
}

/// Complete logger configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoggerConfig {
    /// Logical volume names, one per card slot; the first one is the default
    pub volumes: Vec<String<MAX_VOLUME_NAME_LEN>, MAX_VOLUMES>,
    /// Capture settings
    pub capture: CaptureConfig,
    /// Button debounce window
    pub debounce_ms: u32,
    /// Run loop period
    pub loop_period_ms: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let mut volumes = Vec::new();
        let mut name = String::new();
        let _ = name.push_str(DEFAULT_VOLUME);
        let _ = volumes.push(name);

        Self {
            volumes,
            capture: CaptureConfig::default(),
            debounce_ms: DEBOUNCE_MS,
            loop_period_ms: LOOP_PERIOD_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.volumes.len(), 1);
        assert_eq!(config.volumes[0].as_str(), DEFAULT_VOLUME);
        assert_eq!(config.capture.samples, 128);
        assert_eq!(config.capture.sample_period_ms, 50);
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.loop_period_ms, 500);
    }

    #[test]
    fn test_default_capture_file_is_short_name() {
        let (base, ext) = DEFAULT_CAPTURE_FILE.split_once('.').unwrap();
        assert!(base.len() <= 8);
        assert!(ext.len() <= 3);
    }
}
