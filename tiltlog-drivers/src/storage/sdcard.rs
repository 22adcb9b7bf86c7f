//! [`StorageDriver`] over an `embedded-sdmmc` volume manager
//!
//! Logical volume `"N:"` is partition `N` of the card. Paths are resolved
//! from the root of volume `0:` with `/` separators and 8.3 names.
//!
//! Handles are closed by every operation before it returns, except for open
//! files, which the caller closes. Formatting clears the filesystem behind
//! the volume manager's back, so the manager is rebuilt afterwards and the
//! volume reopened if it was mounted. Once the last volume is unmounted the
//! card is flagged for identification so a swapped card is picked up by the
//! next mount.

use core::fmt::Write;

use embedded_sdmmc::{
    BlockDevice, Error as SdError, Mode, RawDirectory, RawFile, RawVolume, TimeSource, VolumeIdx,
    VolumeManager,
};
use heapless::String;
use tiltlog_core::traits::{
    DirEntry, EntryKind, OpenMode, SpaceInfo, StorageDriver, StorageError,
};

use super::fat::{FatError, Layout};
use super::Removable;

/// Partitions addressable as logical volumes
pub const MAX_VOLUMES: usize = 4;

/// Map a volume manager error to a driver status
fn status<E: core::fmt::Debug>(e: SdError<E>) -> StorageError {
    match e {
        SdError::DeviceError(_) => StorageError::Disk,
        SdError::FormatError(_) | SdError::NoSuchVolume => StorageError::NoFilesystem,
        SdError::FilenameError(_) => StorageError::InvalidName,
        SdError::NotFound => StorageError::NotFound,
        SdError::TooManyOpenFiles | SdError::TooManyOpenDirs | SdError::TooManyOpenVolumes => {
            StorageError::TooManyOpenFiles
        }
        SdError::BadHandle => StorageError::InvalidObject,
        SdError::ReadOnly => StorageError::Denied,
        SdError::FileAlreadyExists => StorageError::Exists,
        SdError::DiskFull | SdError::NotEnoughSpace => StorageError::DiskFull,
        _ => StorageError::Internal,
    }
}

fn fat_status<E>(e: FatError<E>) -> StorageError {
    match e {
        FatError::Device(_) => StorageError::Disk,
        FatError::NoFilesystem => StorageError::NoFilesystem,
    }
}

/// Partition index of a logical volume name such as `"0:"`
fn volume_index(volume: &str) -> Result<usize, StorageError> {
    let digits = volume.strip_suffix(':').ok_or(StorageError::InvalidDrive)?;
    match digits.parse::<usize>() {
        Ok(index) if index < MAX_VOLUMES => Ok(index),
        _ => Err(StorageError::InvalidDrive),
    }
}

/// Card storage
///
/// `D` is a cheap handle to the block device; a clone is kept for the raw
/// FAT operations.
pub struct SdStorage<D, T>
where
    D: BlockDevice + Removable + Clone,
    T: TimeSource + Clone,
{
    device: D,
    time: T,
    manager: VolumeManager<D, T, 4, 4, MAX_VOLUMES>,
    mounted: [Option<RawVolume>; MAX_VOLUMES],
}

impl<D, T> SdStorage<D, T>
where
    D: BlockDevice + Removable + Clone,
    T: TimeSource + Clone,
{
    pub fn new(device: D, time: T) -> Self {
        Self {
            manager: VolumeManager::new_with_limits(device.clone(), time.clone(), 0),
            device,
            time,
            mounted: [None; MAX_VOLUMES],
        }
    }

    fn open_volume(&mut self, index: usize) -> Result<RawVolume, StorageError> {
        self.manager
            .open_raw_volume(VolumeIdx(index))
            .map_err(|e| match e {
                // Card absent or not answering
                SdError::DeviceError(_) => StorageError::NotReady,
                e => status(e),
            })
    }

    fn root(&self) -> Result<RawDirectory, StorageError> {
        let volume = self.mounted[0].ok_or(StorageError::NotEnabled)?;
        self.manager.open_root_dir(volume).map_err(status)
    }

    /// Open the directory holding the last component of `path`
    ///
    /// Returns the directory and the last component.
    fn walk<'p>(&self, path: &'p str) -> Result<(RawDirectory, &'p str), StorageError> {
        let path = path.trim_matches('/');
        let (parents, leaf) = match path.rfind('/') {
            Some(split) => (&path[..split], &path[split + 1..]),
            None => ("", path),
        };

        let mut dir = self.root()?;
        for name in parents.split('/').filter(|n| !n.is_empty()) {
            let child = self.manager.open_dir(dir, name);
            let _ = self.manager.close_dir(dir);
            dir = child.map_err(|e| match e {
                SdError::NotFound => StorageError::PathNotFound,
                e => status(e),
            })?;
        }
        Ok((dir, leaf))
    }

    /// Open `path` as a directory, the root when empty
    fn open_dir(&self, path: &str) -> Result<RawDirectory, StorageError> {
        let (parent, leaf) = self.walk(path)?;
        if leaf.is_empty() {
            return Ok(parent);
        }
        let dir = self.manager.open_dir(parent, leaf);
        let _ = self.manager.close_dir(parent);
        dir.map_err(|e| match e {
            SdError::NotFound => StorageError::PathNotFound,
            e => status(e),
        })
    }
}

impl<D, T> StorageDriver for SdStorage<D, T>
where
    D: BlockDevice + Removable + Clone,
    T: TimeSource + Clone,
{
    type File = RawFile;

    fn mount(&mut self, volume: &str) -> Result<(), StorageError> {
        let index = volume_index(volume)?;
        if let Some(raw) = self.mounted[index].take() {
            let _ = self.manager.close_volume(raw);
        }
        self.mounted[index] = Some(self.open_volume(index)?);
        self.device.mark_ready();
        Ok(())
    }

    fn unmount(&mut self, volume: &str) -> Result<(), StorageError> {
        let index = volume_index(volume)?;
        if let Some(raw) = self.mounted[index] {
            self.manager.close_volume(raw).map_err(status)?;
            self.mounted[index] = None;
        }
        if self.mounted.iter().all(Option::is_none) {
            self.device.mark_uninit();
        }
        Ok(())
    }

    fn is_mounted(&self, volume: &str) -> bool {
        volume_index(volume).is_ok_and(|index| self.mounted[index].is_some())
    }

    fn format(&mut self, volume: &str) -> Result<(), StorageError> {
        let index = volume_index(volume)?;
        let was_open: [bool; MAX_VOLUMES] = core::array::from_fn(|i| self.mounted[i].is_some());
        for raw in self.mounted.iter_mut().filter_map(Option::take) {
            let _ = self.manager.close_volume(raw);
        }

        let formatted = Layout::read(&self.device, index)
            .and_then(|layout| layout.quick_format(&self.device))
            .map_err(fat_status);

        // Drop everything the manager cached about the old filesystem
        self.manager = VolumeManager::new_with_limits(self.device.clone(), self.time.clone(), 0);
        for (i, open) in was_open.into_iter().enumerate() {
            if open {
                self.mounted[i] = self.open_volume(i).ok();
            }
        }
        formatted
    }

    fn free_space(&mut self, volume: &str) -> Result<SpaceInfo, StorageError> {
        let index = volume_index(volume)?;
        if self.mounted[index].is_none() {
            return Err(StorageError::NotEnabled);
        }
        Layout::read(&self.device, index)
            .and_then(|layout| layout.space_info(&self.device))
            .map_err(fat_status)
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<RawFile, StorageError> {
        let (dir, name) = self.walk(path)?;
        let mode = match mode {
            OpenMode::Read => Mode::ReadOnly,
            OpenMode::CreateTruncate => Mode::ReadWriteCreateOrTruncate,
        };
        let file = if name.is_empty() {
            Err(StorageError::InvalidName)
        } else {
            self.manager
                .open_file_in_dir(dir, name, mode)
                .map_err(status)
        };
        let _ = self.manager.close_dir(dir);
        file
    }

    fn write(&mut self, file: &mut RawFile, data: &[u8]) -> Result<usize, StorageError> {
        self.manager.write(*file, data).map_err(status)?;
        Ok(data.len())
    }

    fn read(&mut self, file: &mut RawFile, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.manager.read(*file, buf) {
            Ok(n) => Ok(n),
            Err(SdError::EndOfFile) => Ok(0),
            Err(e) => Err(status(e)),
        }
    }

    fn close(&mut self, file: RawFile) -> Result<(), StorageError> {
        self.manager.close_file(file).map_err(status)
    }

    fn list_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&DirEntry),
    ) -> Result<(), StorageError> {
        let dir = self.open_dir(path)?;
        let result = self.manager.iterate_dir(dir, |entry| {
            let attributes = entry.attributes;
            if attributes.is_volume() || attributes.is_lfn() {
                return;
            }
            let mut name: String<12> = String::new();
            let _ = write!(name, "{}", entry.name);
            let kind = if attributes.is_directory() {
                EntryKind::Directory
            } else if attributes.is_read_only() {
                EntryKind::ReadOnlyFile
            } else {
                EntryKind::WritableFile
            };
            visit(&DirEntry {
                name,
                kind,
                size: entry.size,
            });
        });
        let _ = self.manager.close_dir(dir);
        result.map_err(status)
    }
}
