//! One run of the capture pipeline

use super::orientation::YawIntegrator;
use super::record::SampleRecord;
use crate::config::{CaptureConfig, CAPTURE_HEADER};
use crate::error::Error;
use crate::traits::{Clock, ImuSensor, OpenMode, StorageDriver, StorageError};

/// Outcome of a completed capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureReport {
    /// Data lines written after the header
    pub samples: u16,
}

/// Capture state for one session
///
/// Orientation state starts fresh with every session.
pub struct CaptureSession<'a> {
    config: &'a CaptureConfig,
    yaw: YawIntegrator,
    sample_index: u16,
}

impl<'a> CaptureSession<'a> {
    pub fn new(config: &'a CaptureConfig) -> Self {
        Self {
            config,
            yaw: YawIntegrator::new(),
            sample_index: 0,
        }
    }

    /// Run the session to completion or to the first failure
    ///
    /// The file is closed on every path once it has been opened.
    pub fn run<S, M, C>(
        &mut self,
        storage: &mut S,
        sensor: &mut M,
        clock: &mut C,
    ) -> Result<CaptureReport, Error>
    where
        S: StorageDriver,
        M: ImuSensor,
        C: Clock,
    {
        let mut file = storage
            .open(&self.config.file_name, OpenMode::CreateTruncate)
            .map_err(Error::FileOpenFailed)?;

        let written = self.write_samples(storage, &mut file, sensor, clock);
        let closed = storage.close(file);

        written?;
        closed.map_err(Error::FileWriteFailed)?;
        Ok(CaptureReport {
            samples: self.sample_index,
        })
    }

    fn write_samples<S, M, C>(
        &mut self,
        storage: &mut S,
        file: &mut S::File,
        sensor: &mut M,
        clock: &mut C,
    ) -> Result<(), Error>
    where
        S: StorageDriver,
        M: ImuSensor,
        C: Clock,
    {
        storage
            .write_all(file, CAPTURE_HEADER.as_bytes())
            .map_err(Error::FileWriteFailed)?;

        for index in 1..=self.config.samples {
            let raw = sensor.read_raw().map_err(|_| Error::SensorReadFailed)?;
            let yaw = self.yaw.update(raw.gyro[2], clock.now_us());
            let record = SampleRecord::from_raw(index, &raw, yaw);

            let line = record
                .to_line()
                .map_err(|_| Error::FileWriteFailed(StorageError::InvalidParameter))?;
            storage
                .write_all(file, line.as_bytes())
                .map_err(Error::FileWriteFailed)?;
            self.sample_index = index;

            clock.delay_ms(self.config.sample_period_ms);
        }
        Ok(())
    }
}
