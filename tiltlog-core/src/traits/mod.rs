//! Collaborator traits
//!
//! These traits define the interface between the logger logic and the
//! peripheral drivers. Every call is blocking; the logger runs on a single
//! thread of control and never calls them from interrupt context.

pub mod clock;
pub mod display;
pub mod indicator;
pub mod sensor;
pub mod storage;

pub use clock::{Clock, ClockError, RealTimeClock};
pub use display::{DisplayError, StatusDisplay};
pub use indicator::{Buzzer, Color, Indicator};
pub use sensor::{ImuSensor, RawSample, SensorError};
pub use storage::{
    DirEntry, EntryKind, OpenMode, SpaceInfo, StorageDriver, StorageError, MAX_NAME_LEN,
};
