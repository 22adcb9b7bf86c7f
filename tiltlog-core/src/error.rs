//! Application error taxonomy
//!
//! Every operation reachable from the console or the buttons returns one of
//! these. Errors are reported at the command boundary and never stop the run
//! loop.

use core::fmt;

use crate::traits::StorageError;

/// Errors surfaced by logger operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Named volume is not configured
    UnknownVolume,
    /// Driver refused to mount the volume
    MountFailed(StorageError),
    /// Driver refused to unmount the volume
    UnmountFailed(StorageError),
    /// Driver failed to create a filesystem
    FormatFailed(StorageError),
    /// Free space query failed
    QueryFailed(StorageError),
    /// File could not be opened
    FileOpenFailed(StorageError),
    /// Write failed or was short
    FileWriteFailed(StorageError),
    /// Read failed
    FileReadFailed(StorageError),
    /// Directory could not be listed
    ListFailed(StorageError),
    /// Sensor register read failed
    SensorReadFailed,
    /// Real-time clock rejected the new value
    ClockFailed,
    /// First token of the line is not a known command
    CommandNotFound,
    /// Required argument was not given
    MissingArgument,
    /// Argument could not be parsed or is out of range
    InvalidArgument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownVolume => f.write_str("Unknown logical drive"),
            Error::MountFailed(e) => write!(f, "mount error: {} ({})", e, e.code()),
            Error::UnmountFailed(e) => write!(f, "unmount error: {} ({})", e, e.code()),
            Error::FormatFailed(e) => write!(f, "format error: {} ({})", e, e.code()),
            Error::QueryFailed(e) => write!(f, "getfree error: {} ({})", e, e.code()),
            Error::FileOpenFailed(e) => write!(f, "open error: {} ({})", e, e.code()),
            Error::FileWriteFailed(e) => write!(f, "write error: {} ({})", e, e.code()),
            Error::FileReadFailed(e) => write!(f, "read error: {} ({})", e, e.code()),
            Error::ListFailed(e) => write!(f, "directory error: {} ({})", e, e.code()),
            Error::SensorReadFailed => f.write_str("sensor read error"),
            Error::ClockFailed => f.write_str("real-time clock error"),
            Error::CommandNotFound => f.write_str("command not found"),
            Error::MissingArgument => f.write_str("Missing argument"),
            Error::InvalidArgument => f.write_str("Invalid argument"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String;

    #[test]
    fn test_display_includes_driver_code() {
        let mut s: String<64> = String::new();
        write!(s, "{}", Error::MountFailed(StorageError::NotReady)).unwrap();
        assert_eq!(s.as_str(), "mount error: device not ready (3)");
    }
}
