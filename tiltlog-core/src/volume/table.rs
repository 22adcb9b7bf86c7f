//! Table of configured logical volumes

use heapless::{String, Vec};

use super::machine::{MountState, VolumeEvent};
use crate::config::{LoggerConfig, MAX_VOLUMES, MAX_VOLUME_NAME_LEN};
use crate::error::Error;
use crate::traits::{SpaceInfo, StorageDriver, StorageError};

/// Driver status bits of a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags(u8);

impl StatusFlags {
    /// Medium must be initialized before the next access
    pub const NEEDS_INIT: Self = Self(0x01);
    /// No medium in the slot
    pub const NO_MEDIUM: Self = Self(0x02);
    /// Medium is write protected
    pub const WRITE_PROTECTED: Self = Self(0x04);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

/// One mountable storage unit
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicalVolume {
    name: String<MAX_VOLUME_NAME_LEN>,
    state: MountState,
    status: StatusFlags,
}

impl LogicalVolume {
    pub fn new(name: String<MAX_VOLUME_NAME_LEN>) -> Self {
        Self {
            name,
            state: MountState::Unmounted,
            status: StatusFlags::NEEDS_INIT,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_mounted()
    }

    pub fn status(&self) -> StatusFlags {
        self.status
    }

    fn apply(&mut self, event: VolumeEvent) {
        self.state = self.state.transition(event);
        if self.state.is_mounted() {
            self.status.remove(StatusFlags::NEEDS_INIT);
        } else {
            self.status.insert(StatusFlags::NEEDS_INIT);
        }
    }

    /// Record what a driver failure says about the medium
    fn note(&mut self, error: StorageError) {
        match error {
            StorageError::NotReady => self.status.insert(StatusFlags::NO_MEDIUM),
            StorageError::WriteProtected => self.status.insert(StatusFlags::WRITE_PROTECTED),
            _ => {}
        }
    }
}

/// All configured volumes, in slot order
#[derive(Debug, Clone)]
pub struct VolumeTable {
    volumes: Vec<LogicalVolume, MAX_VOLUMES>,
}

impl VolumeTable {
    pub fn new(config: &LoggerConfig) -> Self {
        let volumes = config
            .volumes
            .iter()
            .map(|name| LogicalVolume::new(name.clone()))
            .collect();
        Self { volumes }
    }

    pub fn volumes(&self) -> &[LogicalVolume] {
        &self.volumes
    }

    /// Look a volume up by name; `None` selects the first configured volume
    pub fn resolve(&self, name: Option<&str>) -> Result<usize, Error> {
        match name {
            None if !self.volumes.is_empty() => Ok(0),
            None => Err(Error::UnknownVolume),
            Some(name) => self
                .volumes
                .iter()
                .position(|v| v.name() == name)
                .ok_or(Error::UnknownVolume),
        }
    }

    pub fn get(&self, name: Option<&str>) -> Result<&LogicalVolume, Error> {
        let index = self.resolve(name)?;
        Ok(&self.volumes[index])
    }

    /// Mount a volume through the driver
    pub fn mount<S: StorageDriver>(
        &mut self,
        storage: &mut S,
        name: Option<&str>,
    ) -> Result<&LogicalVolume, Error> {
        let index = self.resolve(name)?;
        let volume = &mut self.volumes[index];
        match storage.mount(volume.name()) {
            Ok(()) => {
                volume.apply(VolumeEvent::MountSucceeded);
                volume.status.remove(StatusFlags::NO_MEDIUM);
                Ok(volume)
            }
            Err(e) => {
                volume.apply(VolumeEvent::MountFailed);
                volume.note(e);
                Err(Error::MountFailed(e))
            }
        }
    }

    /// Unmount a volume through the driver
    ///
    /// A successful unmount flags the volume as needing initialization so a
    /// stale handle is never reused. The medium may be swapped afterwards, so
    /// write protection is forgotten.
    pub fn unmount<S: StorageDriver>(
        &mut self,
        storage: &mut S,
        name: Option<&str>,
    ) -> Result<&LogicalVolume, Error> {
        let index = self.resolve(name)?;
        let volume = &mut self.volumes[index];
        match storage.unmount(volume.name()) {
            Ok(()) => {
                volume.apply(VolumeEvent::UnmountSucceeded);
                volume.status.remove(StatusFlags::WRITE_PROTECTED);
                Ok(volume)
            }
            Err(e) => {
                volume.apply(VolumeEvent::UnmountFailed);
                Err(Error::UnmountFailed(e))
            }
        }
    }

    /// Format a volume, mounted or not
    ///
    /// Afterwards the recorded state is taken from the driver, whatever the
    /// outcome.
    pub fn format<S: StorageDriver>(
        &mut self,
        storage: &mut S,
        name: Option<&str>,
    ) -> Result<&LogicalVolume, Error> {
        let index = self.resolve(name)?;
        let volume = &mut self.volumes[index];
        let result = storage.format(volume.name());
        let mounted = storage.is_mounted(volume.name());
        volume.apply(VolumeEvent::Observed { mounted });
        match result {
            Ok(()) => {
                volume.status.remove(StatusFlags::WRITE_PROTECTED);
                Ok(volume)
            }
            Err(e) => {
                volume.note(e);
                Err(Error::FormatFailed(e))
            }
        }
    }

    /// Query cluster geometry and free clusters of a volume
    pub fn free_space<S: StorageDriver>(
        &self,
        storage: &mut S,
        name: Option<&str>,
    ) -> Result<SpaceInfo, Error> {
        let volume = self.get(name)?;
        storage
            .free_space(volume.name())
            .map_err(Error::QueryFailed)
    }
}
