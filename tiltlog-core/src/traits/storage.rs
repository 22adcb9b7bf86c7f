//! Removable storage traits

use core::fmt;

use heapless::String;

/// Longest entry name reported by a directory listing (8.3 plus the dot)
pub const MAX_NAME_LEN: usize = 12;

/// Errors reported by the storage driver
///
/// Each variant maps to a stable numeric status shown on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Low level block device error
    Disk,
    /// Assertion failure inside the filesystem layer
    Internal,
    /// Medium absent or not initialized
    NotReady,
    /// File does not exist
    NotFound,
    /// Directory in the path does not exist
    PathNotFound,
    /// Name is not a valid short name
    InvalidName,
    /// Access denied (read-only file, directory full)
    Denied,
    /// Object already exists
    Exists,
    /// File or directory handle is stale
    InvalidObject,
    /// Medium is write protected
    WriteProtected,
    /// Volume does not exist on the medium
    InvalidDrive,
    /// Volume is not mounted
    NotEnabled,
    /// No valid FAT filesystem on the volume
    NoFilesystem,
    /// Filesystem creation was aborted
    FormatAborted,
    /// Too many files open at once
    TooManyOpenFiles,
    /// Parameter rejected by the driver
    InvalidParameter,
    /// No free cluster left for the data
    DiskFull,
}

impl StorageError {
    /// Numeric driver status
    pub fn code(&self) -> u8 {
        match self {
            StorageError::Disk => 1,
            StorageError::Internal => 2,
            StorageError::NotReady => 3,
            StorageError::NotFound => 4,
            StorageError::PathNotFound => 5,
            StorageError::InvalidName => 6,
            StorageError::Denied => 7,
            StorageError::Exists => 8,
            StorageError::InvalidObject => 9,
            StorageError::WriteProtected => 10,
            StorageError::InvalidDrive => 11,
            StorageError::NotEnabled => 12,
            StorageError::NoFilesystem => 13,
            StorageError::FormatAborted => 14,
            StorageError::TooManyOpenFiles => 18,
            StorageError::InvalidParameter => 19,
            StorageError::DiskFull => 20,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StorageError::Disk => "hard error in low level disk I/O",
            StorageError::Internal => "assertion failed",
            StorageError::NotReady => "device not ready",
            StorageError::NotFound => "file not found",
            StorageError::PathNotFound => "path not found",
            StorageError::InvalidName => "invalid path name",
            StorageError::Denied => "access denied",
            StorageError::Exists => "object already exists",
            StorageError::InvalidObject => "invalid object",
            StorageError::WriteProtected => "write protected",
            StorageError::InvalidDrive => "invalid drive",
            StorageError::NotEnabled => "volume not mounted",
            StorageError::NoFilesystem => "no valid FAT volume",
            StorageError::FormatAborted => "format aborted",
            StorageError::TooManyOpenFiles => "too many open files",
            StorageError::InvalidParameter => "invalid parameter",
            StorageError::DiskFull => "disk full",
        };
        f.write_str(text)
    }
}

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Existing file, read only
    Read,
    /// Create the file, or truncate it if it exists, for writing
    CreateTruncate,
}

/// Filesystem geometry needed for the free space report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpaceInfo {
    /// Usable data clusters (FAT entries minus the two reserved ones)
    pub total_clusters: u32,
    /// Clusters currently free
    pub free_clusters: u32,
    /// Sectors per cluster
    pub sectors_per_cluster: u32,
}

impl SpaceInfo {
    /// Total capacity in KiB, assuming 512 byte sectors
    pub fn total_kib(&self) -> u32 {
        self.total_clusters.wrapping_mul(self.sectors_per_cluster) / 2
    }

    /// Free capacity in KiB, assuming 512 byte sectors
    pub fn free_kib(&self) -> u32 {
        self.free_clusters.wrapping_mul(self.sectors_per_cluster) / 2
    }
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryKind {
    Directory,
    ReadOnlyFile,
    WritableFile,
}

impl EntryKind {
    /// Tag printed by `ls`
    pub fn tag(&self) -> &'static str {
        match self {
            EntryKind::Directory => "directory",
            EntryKind::ReadOnlyFile => "read only file",
            EntryKind::WritableFile => "writable file",
        }
    }
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirEntry {
    pub name: String<MAX_NAME_LEN>,
    pub kind: EntryKind,
    pub size: u32,
}

/// Storage driver with a FAT style file API
///
/// Volume names are the logical names from the volume table. Paths are
/// resolved against the default volume and use `/` as separator.
pub trait StorageDriver {
    /// Open file handle
    type File;

    /// Mount the filesystem of a volume
    fn mount(&mut self, volume: &str) -> Result<(), StorageError>;

    /// Unmount a volume, invalidating every handle opened on it
    fn unmount(&mut self, volume: &str) -> Result<(), StorageError>;

    /// Whether the driver currently holds a usable filesystem for a volume
    fn is_mounted(&self, volume: &str) -> bool;

    /// Create a fresh filesystem on a volume
    ///
    /// Allowed while the volume is mounted.
    fn format(&mut self, volume: &str) -> Result<(), StorageError>;

    /// Query cluster geometry and free cluster count
    fn free_space(&mut self, volume: &str) -> Result<SpaceInfo, StorageError>;

    /// Open a file
    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::File, StorageError>;

    /// Write bytes, returning how many were accepted
    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<usize, StorageError>;

    /// Read bytes, returning 0 at end of file
    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Flush and release a file handle
    fn close(&mut self, file: Self::File) -> Result<(), StorageError>;

    /// Visit every entry of a directory
    fn list_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&DirEntry),
    ) -> Result<(), StorageError>;

    /// Write all of `data`; a short write counts as a full medium
    fn write_all(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), StorageError> {
        let written = self.write(file, data)?;
        if written < data.len() {
            return Err(StorageError::DiskFull);
        }
        Ok(())
    }
}
