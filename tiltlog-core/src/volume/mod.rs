//! Logical volumes and their mount lifecycle
//!
//! The table owns one [`LogicalVolume`] per configured card slot. All mount,
//! unmount and format requests go through it so the recorded state always
//! follows what the storage driver reports.

pub mod machine;
pub mod table;

pub use machine::{MountState, VolumeEvent};
pub use table::{LogicalVolume, StatusFlags, VolumeTable};
