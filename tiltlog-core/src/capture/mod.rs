//! Sensor capture pipeline
//!
//! A capture session truncates the capture file, writes the CSV header and
//! appends one derived orientation record per sensor sample. Any failure
//! stops the session; the file is always closed and whatever was written
//! stays on the medium.

pub mod orientation;
pub mod record;
pub mod session;

pub use orientation::{normalize_accel, tilt_angles, wrap_degrees, YawIntegrator};
pub use record::SampleRecord;
pub use session::{CaptureReport, CaptureSession};
