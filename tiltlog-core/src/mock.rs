//! Test doubles for the collaborator traits

use std::string::String;
use std::vec::Vec;

use crate::datetime::DateTime;
use crate::device::{Board, Peripherals};
use crate::traits::{
    Buzzer, Clock, ClockError, Color, DirEntry, DisplayError, EntryKind, ImuSensor, Indicator,
    OpenMode, RawSample, RealTimeClock, SensorError, SpaceInfo, StatusDisplay, StorageDriver,
    StorageError,
};

struct MockFile {
    path: String,
    data: Vec<u8>,
    read_only: bool,
}

/// Open handle into [`MockStorage`]
#[derive(Debug)]
pub struct MockHandle {
    index: usize,
    pos: usize,
    mode: OpenMode,
}

/// In-memory single-volume storage with failure injection
pub struct MockStorage {
    volume: &'static str,
    mounted: bool,
    files: Vec<MockFile>,
    pub dirs: Vec<&'static str>,
    pub space: SpaceInfo,
    pub fail_mount: Option<StorageError>,
    pub fail_unmount: Option<StorageError>,
    pub fail_format: Option<StorageError>,
    pub fail_free: Option<StorageError>,
    pub fail_close: Option<StorageError>,
    /// Number of writes that succeed before every further write fails
    pub fail_write_after: Option<usize>,
    /// Accept only half of every write
    pub short_writes: bool,
    /// A format leaves the volume unmounted
    pub format_drops_mount: bool,
    pub mount_calls: usize,
    pub format_calls: usize,
    pub write_calls: usize,
    pub open_handles: usize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            volume: "0:",
            mounted: false,
            files: Vec::new(),
            dirs: Vec::new(),
            space: SpaceInfo {
                total_clusters: 1000,
                free_clusters: 600,
                sectors_per_cluster: 8,
            },
            fail_mount: None,
            fail_unmount: None,
            fail_format: None,
            fail_free: None,
            fail_close: None,
            fail_write_after: None,
            short_writes: false,
            format_drops_mount: false,
            mount_calls: 0,
            format_calls: 0,
            write_calls: 0,
            open_handles: 0,
        }
    }

    pub fn mounted() -> Self {
        let mut storage = Self::new();
        storage.mounted = true;
        storage
    }

    pub fn add_file(&mut self, path: &str, data: &[u8], read_only: bool) {
        self.files.push(MockFile {
            path: path.into(),
            data: data.to_vec(),
            read_only,
        });
    }

    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.data.as_slice())
    }

    pub fn file_text(&self, path: &str) -> Option<&str> {
        self.file(path).and_then(|d| core::str::from_utf8(d).ok())
    }

    fn check_volume(&self, volume: &str) -> Result<(), StorageError> {
        if volume == self.volume {
            Ok(())
        } else {
            Err(StorageError::InvalidDrive)
        }
    }

    fn check_mounted(&self) -> Result<(), StorageError> {
        if self.mounted {
            Ok(())
        } else {
            Err(StorageError::NotEnabled)
        }
    }
}

impl StorageDriver for MockStorage {
    type File = MockHandle;

    fn mount(&mut self, volume: &str) -> Result<(), StorageError> {
        self.check_volume(volume)?;
        self.mount_calls += 1;
        if let Some(e) = self.fail_mount {
            self.mounted = false;
            return Err(e);
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self, volume: &str) -> Result<(), StorageError> {
        self.check_volume(volume)?;
        if let Some(e) = self.fail_unmount {
            return Err(e);
        }
        self.mounted = false;
        self.open_handles = 0;
        Ok(())
    }

    fn is_mounted(&self, volume: &str) -> bool {
        volume == self.volume && self.mounted
    }

    fn format(&mut self, volume: &str) -> Result<(), StorageError> {
        self.check_volume(volume)?;
        self.format_calls += 1;
        if self.format_drops_mount {
            self.mounted = false;
        }
        if let Some(e) = self.fail_format {
            return Err(e);
        }
        self.files.clear();
        Ok(())
    }

    fn free_space(&mut self, volume: &str) -> Result<SpaceInfo, StorageError> {
        self.check_volume(volume)?;
        self.check_mounted()?;
        if let Some(e) = self.fail_free {
            return Err(e);
        }
        Ok(self.space)
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<MockHandle, StorageError> {
        self.check_mounted()?;
        let path = path.trim_start_matches('/');
        let existing = self.files.iter().position(|f| f.path == path);
        let index = match (mode, existing) {
            (OpenMode::Read, Some(index)) => index,
            (OpenMode::Read, None) => return Err(StorageError::NotFound),
            (OpenMode::CreateTruncate, Some(index)) => {
                if self.files[index].read_only {
                    return Err(StorageError::Denied);
                }
                self.files[index].data.clear();
                index
            }
            (OpenMode::CreateTruncate, None) => {
                self.files.push(MockFile {
                    path: path.into(),
                    data: Vec::new(),
                    read_only: false,
                });
                self.files.len() - 1
            }
        };
        self.open_handles += 1;
        Ok(MockHandle {
            index,
            pos: 0,
            mode,
        })
    }

    fn write(&mut self, file: &mut MockHandle, data: &[u8]) -> Result<usize, StorageError> {
        if file.mode != OpenMode::CreateTruncate {
            return Err(StorageError::Denied);
        }
        if let Some(limit) = self.fail_write_after {
            if self.write_calls >= limit {
                return Err(StorageError::Disk);
            }
        }
        self.write_calls += 1;
        let accepted = if self.short_writes {
            data.len() / 2
        } else {
            data.len()
        };
        self.files[file.index]
            .data
            .extend_from_slice(&data[..accepted]);
        file.pos += accepted;
        Ok(accepted)
    }

    fn read(&mut self, file: &mut MockHandle, buf: &mut [u8]) -> Result<usize, StorageError> {
        let data = &self.files[file.index].data;
        let remaining = &data[file.pos.min(data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        file.pos += n;
        Ok(n)
    }

    fn close(&mut self, _file: MockHandle) -> Result<(), StorageError> {
        self.open_handles = self.open_handles.saturating_sub(1);
        match self.fail_close {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn list_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&DirEntry),
    ) -> Result<(), StorageError> {
        self.check_mounted()?;
        let path = path.trim_matches('/');
        if !path.is_empty() && !self.dirs.contains(&path) {
            return Err(StorageError::PathNotFound);
        }
        if path.is_empty() {
            for dir in &self.dirs {
                let mut name = heapless::String::new();
                let _ = name.push_str(dir);
                visit(&DirEntry {
                    name,
                    kind: EntryKind::Directory,
                    size: 0,
                });
            }
            for file in &self.files {
                let mut name = heapless::String::new();
                let _ = name.push_str(&file.path);
                let kind = if file.read_only {
                    EntryKind::ReadOnlyFile
                } else {
                    EntryKind::WritableFile
                };
                visit(&DirEntry {
                    name,
                    kind,
                    size: file.data.len() as u32,
                });
            }
        }
        Ok(())
    }
}

/// Sensor returning a fixed sample, optionally failing after some reads
pub struct MockSensor {
    pub sample: RawSample,
    pub resets: usize,
    pub reads: usize,
    pub fail_after: Option<usize>,
}

impl MockSensor {
    pub fn new(sample: RawSample) -> Self {
        Self {
            sample,
            resets: 0,
            reads: 0,
            fail_after: None,
        }
    }

    /// Level sensor at rest: 1 g on z, no rotation
    pub fn level() -> Self {
        Self::new(RawSample {
            accel: [0, 0, 16384],
            gyro: [0, 0, 0],
            temp: 0,
        })
    }
}

impl ImuSensor for MockSensor {
    fn reset(&mut self) -> Result<(), SensorError> {
        self.resets += 1;
        Ok(())
    }

    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        if let Some(limit) = self.fail_after {
            if self.reads >= limit {
                return Err(SensorError::Bus);
            }
        }
        self.reads += 1;
        Ok(self.sample)
    }
}

/// Clock that only advances through delays
pub struct MockClock {
    pub now_us: u64,
    pub delays: Vec<u32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now_us: 1_000_000,
            delays: Vec::new(),
        }
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.now_us
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now_us += ms as u64 * 1000;
    }
}

/// Records every colour change
pub struct MockIndicator {
    pub history: Vec<Color>,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<Color> {
        self.history.last().copied()
    }

    pub fn count(&self, color: Color) -> usize {
        self.history.iter().filter(|c| **c == color).count()
    }
}

impl Indicator for MockIndicator {
    fn set_color(&mut self, color: Color) {
        self.history.push(color);
    }
}

/// Records every beep request
pub struct MockBuzzer {
    pub beeps: Vec<(u32, u32, u8)>,
}

impl MockBuzzer {
    pub fn new() -> Self {
        Self { beeps: Vec::new() }
    }
}

impl Buzzer for MockBuzzer {
    fn beep(&mut self, freq_hz: u32, duration_ms: u32, repeat: u8) {
        self.beeps.push((freq_hz, duration_ms, repeat));
    }
}

/// Keeps the lines of the last flushed frame
pub struct MockDisplay {
    pending: Vec<(String, i32, i32)>,
    pub frame: Vec<(String, i32, i32)>,
    pub flushes: usize,
    /// Every flush fails with a bus error
    pub fail: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            frame: Vec::new(),
            flushes: 0,
            fail: false,
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.frame.iter().map(|(t, _, _)| t.as_str()).collect()
    }
}

impl StatusDisplay for MockDisplay {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_line(&mut self, text: &str, x: i32, y: i32) {
        self.pending.push((text.into(), x, y));
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Bus);
        }
        self.frame = self.pending.clone();
        self.flushes += 1;
        Ok(())
    }
}

/// Stores the last value written
pub struct MockRtc {
    pub current: Option<DateTime>,
}

impl MockRtc {
    pub fn new() -> Self {
        Self { current: None }
    }
}

impl RealTimeClock for MockRtc {
    fn set_datetime(&mut self, datetime: &DateTime) -> Result<(), ClockError> {
        self.current = Some(*datetime);
        Ok(())
    }
}

/// Board made of the doubles above
pub struct MockBoard;

impl Board for MockBoard {
    type Storage = MockStorage;
    type Sensor = MockSensor;
    type Light = MockIndicator;
    type Buzzer = MockBuzzer;
    type Display = MockDisplay;
    type Clock = MockClock;
    type Rtc = MockRtc;
}

pub fn peripherals(storage: MockStorage, sensor: MockSensor) -> Peripherals<MockBoard> {
    Peripherals {
        storage,
        sensor,
        light: MockIndicator::new(),
        buzzer: MockBuzzer::new(),
        display: MockDisplay::new(),
        clock: MockClock::new(),
        rtc: MockRtc::new(),
    }
}
