//! Device state and the operations behind commands, shortcuts and buttons
//!
//! Every operation reports its own outcome on the console and through the
//! indicator and buzzer, then returns the result so the caller can log it.
//! None of them is fatal.

use core::fmt::Write;

use crate::capture::{CaptureReport, CaptureSession};
use crate::config::{BeepPattern, LoggerConfig};
use crate::console::{Args, Command, Shortcut, COMMANDS};
use crate::datetime::{DateTime, DateTimeError};
use crate::error::Error;
use crate::feedback::{self, Banner};
use crate::traits::{
    Buzzer, Clock, Color, DirEntry, DisplayError, ImuSensor, Indicator, OpenMode, RealTimeClock,
    StatusDisplay, StorageDriver,
};
use crate::volume::VolumeTable;

/// Chunk size used when streaming files to the console
const STREAM_CHUNK: usize = 128;

/// Prompt printed after shortcut and button actions
const CHOOSE_HINT: &str = "\nChoose a command (h = help):  ";

/// Clears an ANSI terminal and homes the cursor
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Concrete collaborator types of a board
pub trait Board {
    type Storage: StorageDriver;
    type Sensor: ImuSensor;
    type Light: Indicator;
    type Buzzer: Buzzer;
    type Display: StatusDisplay;
    type Clock: Clock;
    type Rtc: RealTimeClock;
}

/// Collaborators owned by the device
pub struct Peripherals<B: Board> {
    pub storage: B::Storage,
    pub sensor: B::Sensor,
    pub light: B::Light,
    pub buzzer: B::Buzzer,
    pub display: B::Display,
    pub clock: B::Clock,
    pub rtc: B::Rtc,
}

/// Mutable application state threaded through every handler
pub struct DeviceState {
    pub volumes: VolumeTable,
    pub config: LoggerConfig,
}

impl DeviceState {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            volumes: VolumeTable::new(&config),
            config,
        }
    }
}

/// The logger device: state plus peripherals
pub struct Device<B: Board> {
    state: DeviceState,
    hw: Peripherals<B>,
    /// Last display failure not yet collected by the firmware
    display_fault: Option<DisplayError>,
}

impl<B: Board> Device<B> {
    pub fn new(config: LoggerConfig, hw: Peripherals<B>) -> Self {
        Self {
            state: DeviceState::new(config),
            hw,
            display_fault: None,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn peripherals(&self) -> &Peripherals<B> {
        &self.hw
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<B> {
        &mut self.hw
    }

    /// Take the most recent display failure, if any
    ///
    /// Banners keep going when the panel does not answer; the fault is
    /// kept here for the run loop to log.
    pub fn take_display_fault(&mut self) -> Option<DisplayError> {
        self.display_fault.take()
    }

    fn show(&mut self, banner: Banner) {
        if let Err(e) = banner.show(&mut self.hw.display) {
            self.display_fault = Some(e);
        }
    }

    /// Power-on sequence
    pub fn boot<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
        self.hw.light.set_color(Color::Yellow);
        let sensor = self.hw.sensor.reset().map_err(|_| Error::SensorReadFailed);
        self.show(Banner::BOOT);

        let _ = out.write_str(CLEAR_SCREEN);
        if sensor.is_err() {
            let _ = writeln!(out, "[WARN] MPU6050 did not answer the reset");
        }
        self.help(out);
        sensor
    }

    /// Run a parsed console command
    pub fn execute<W: Write>(&mut self, command: Command<'_>, out: &mut W) -> Result<(), Error> {
        match command {
            Command::SetRtc(args) => self.set_rtc(args, out),
            Command::Format(name) => self.format(name, out),
            Command::Mount(name) => self.mount(name, out),
            Command::Unmount(name) => self.unmount(name, out),
            Command::GetFree(name) => self.free_space(name, out),
            Command::Ls(path) => self.list(path, out),
            Command::Cat(path) => self.cat(path, out),
            Command::Help => {
                self.help(out);
                Ok(())
            }
        }
    }

    /// Print the error, blink the failure pattern and settle on `settle`
    fn report<W: Write>(
        &mut self,
        error: Error,
        name: Option<&str>,
        settle: Color,
        out: &mut W,
    ) -> Error {
        let _ = match error {
            Error::UnknownVolume => {
                writeln!(out, "Unknown logical drive number: \"{}\"", name.unwrap_or(""))
            }
            e => writeln!(out, "{}", e),
        };
        feedback::failure(&mut self.hw.light, &mut self.hw.clock, settle);
        error
    }

    pub fn mount<W: Write>(&mut self, name: Option<&str>, out: &mut W) -> Result<(), Error> {
        match self.state.volumes.mount(&mut self.hw.storage, name) {
            Ok(volume) => {
                let _ = writeln!(out, "SD card ( {} ) mounted", volume.name());
                self.hw.light.set_color(Color::Green);
                feedback::beep(&mut self.hw.buzzer, BeepPattern::MOUNTED);
                Ok(())
            }
            Err(e) => Err(self.report(e, name, Color::Yellow, out)),
        }
    }

    pub fn unmount<W: Write>(&mut self, name: Option<&str>, out: &mut W) -> Result<(), Error> {
        match self.state.volumes.unmount(&mut self.hw.storage, name) {
            Ok(volume) => {
                let _ = writeln!(out, "SD card ( {} ) unmounted", volume.name());
                self.hw.light.set_color(Color::Yellow);
                feedback::beep(&mut self.hw.buzzer, BeepPattern::UNMOUNTED);
                Ok(())
            }
            Err(Error::UnknownVolume) => {
                Err(self.report(Error::UnknownVolume, name, Color::Yellow, out))
            }
            // Volume is still mounted
            Err(e) => Err(self.report(e, name, Color::Green, out)),
        }
    }

    pub fn format<W: Write>(&mut self, name: Option<&str>, out: &mut W) -> Result<(), Error> {
        if let Err(e) = self.state.volumes.resolve(name) {
            return Err(self.report(e, name, Color::Yellow, out));
        }

        self.hw.light.set_color(Color::Blue);
        match self.state.volumes.format(&mut self.hw.storage, name) {
            Ok(volume) => {
                let _ = writeln!(out, "SD card ( {} ) formatted", volume.name());
                feedback::done(&mut self.hw.light, &mut self.hw.clock);
                Ok(())
            }
            Err(e) => Err(self.report(e, name, Color::Green, out)),
        }
    }

    pub fn free_space<W: Write>(&mut self, name: Option<&str>, out: &mut W) -> Result<(), Error> {
        match self.state.volumes.free_space(&mut self.hw.storage, name) {
            Ok(info) => {
                self.hw.light.set_color(Color::Blue);
                let _ = write!(
                    out,
                    "{:>10} KiB total drive space.\n{:>10} KiB available.\n",
                    info.total_kib(),
                    info.free_kib()
                );
                self.hw.light.set_color(Color::Green);
                Ok(())
            }
            Err(e) => Err(self.report(e, name, Color::Yellow, out)),
        }
    }

    /// List a directory, the root by default
    pub fn list<W: Write>(&mut self, path: Option<&str>, out: &mut W) -> Result<(), Error> {
        let path = path.unwrap_or("/");
        let _ = write!(out, "Directory Listing: {}\n\n", path);

        let light = &mut self.hw.light;
        let result = self.hw.storage.list_dir(path, &mut |entry: &DirEntry| {
            light.set_color(Color::Blue);
            let _ = writeln!(
                out,
                "{} [{}] [size={}]",
                entry.name,
                entry.kind.tag(),
                entry.size
            );
        });

        match result {
            Ok(()) => {
                feedback::done(&mut self.hw.light, &mut self.hw.clock);
                Ok(())
            }
            Err(e) => Err(self.report(Error::ListFailed(e), None, Color::Yellow, out)),
        }
    }

    /// Stream a file to the console
    pub fn cat<W: Write>(&mut self, path: Option<&str>, out: &mut W) -> Result<(), Error> {
        let Some(path) = path else {
            let _ = writeln!(out, "{}", Error::MissingArgument);
            return Err(Error::MissingArgument);
        };

        let mut file = match self.hw.storage.open(path, OpenMode::Read) {
            Ok(file) => file,
            Err(e) => {
                let _ = writeln!(out, "{}", Error::FileOpenFailed(e));
                return Err(Error::FileOpenFailed(e));
            }
        };
        let streamed = self.stream(&mut file, None, out);
        let closed = self.hw.storage.close(file).map_err(Error::FileReadFailed);

        if let Err(e) = streamed.and(closed) {
            let _ = writeln!(out, "{}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Copy an open file to the console chunk by chunk
    fn stream<W: Write>(
        &mut self,
        file: &mut <B::Storage as StorageDriver>::File,
        busy: Option<Color>,
        out: &mut W,
    ) -> Result<(), Error> {
        let mut buf = [0u8; STREAM_CHUNK];
        loop {
            let n = self
                .hw
                .storage
                .read(file, &mut buf)
                .map_err(Error::FileReadFailed)?;
            if n == 0 {
                return Ok(());
            }
            if let Some(color) = busy {
                self.hw.light.set_color(color);
            }
            for &byte in &buf[..n] {
                let _ = out.write_char(char::from(byte));
            }
        }
    }

    /// Print the shortcut keys and the command table
    pub fn help<W: Write>(&self, out: &mut W) {
        let _ = write!(out, "\nAvailable commands:\n\n");
        for shortcut in Shortcut::ALL {
            let _ = writeln!(
                out,
                "Type '{}' then Enter to {}",
                shortcut.key(),
                shortcut.description()
            );
        }
        let _ = writeln!(out);
        for command in COMMANDS.iter() {
            let _ = writeln!(out, "{}", command.help);
        }
    }

    /// `setrtc DD MM YY hh mm ss`
    pub fn set_rtc<W: Write>(&mut self, args: Args<'_>, out: &mut W) -> Result<(), Error> {
        let result = match DateTime::from_fields(args) {
            Err(DateTimeError::Missing) => Err(Error::MissingArgument),
            Err(DateTimeError::Invalid) => Err(Error::InvalidArgument),
            Ok(datetime) => self
                .hw
                .rtc
                .set_datetime(&datetime)
                .map(|()| datetime)
                .map_err(|_| Error::ClockFailed),
        };

        match result {
            Ok(datetime) => {
                let _ = writeln!(out, "Real time clock set to {}", datetime);
                Ok(())
            }
            Err(e) => {
                let _ = writeln!(out, "{}", e);
                Err(e)
            }
        }
    }

    /// Stream the capture file to the console
    pub fn read_capture_file<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
        let path = self.state.config.capture.file_name.clone();
        let mut file = match self.hw.storage.open(&path, OpenMode::Read) {
            Ok(file) => file,
            Err(e) => {
                let _ = writeln!(
                    out,
                    "[ERROR] Could not open the file for reading. \
                     Check that the card is mounted and the file exists.\n"
                );
                feedback::failure(&mut self.hw.light, &mut self.hw.clock, Color::Yellow);
                return Err(Error::FileOpenFailed(e));
            }
        };

        let _ = writeln!(out, "Contents of file {}:", path);
        let streamed = self.stream(&mut file, Some(Color::Blue), out);
        let closed = self.hw.storage.close(file).map_err(Error::FileReadFailed);
        if let Err(e) = streamed.and(closed) {
            return Err(self.report(e, None, Color::Yellow, out));
        }

        feedback::done(&mut self.hw.light, &mut self.hw.clock);
        let _ = write!(out, "\nReading of file {} complete.\n\n", path);
        Ok(())
    }

    /// Record one capture session into the capture file
    pub fn capture<W: Write>(&mut self, out: &mut W) -> Result<CaptureReport, Error> {
        self.hw.light.set_color(Color::Red);
        feedback::beep(&mut self.hw.buzzer, BeepPattern::CAPTURE_STARTED);
        let _ = writeln!(out, "\nCapturing MPU6050 data. Please wait...");

        let capture = &self.state.config.capture;
        let result = CaptureSession::new(capture).run(
            &mut self.hw.storage,
            &mut self.hw.sensor,
            &mut self.hw.clock,
        );

        match result {
            Ok(report) => {
                self.hw.light.set_color(Color::Green);
                feedback::beep(&mut self.hw.buzzer, BeepPattern::CAPTURE_FINISHED);
                let _ = write!(out, "\nData saved to file {}.\n\n", capture.file_name);
                Ok(report)
            }
            Err(e) => {
                let _ = match e {
                    Error::FileOpenFailed(_) => writeln!(
                        out,
                        "\n[ERROR] Could not open the file for writing. Mount the card."
                    ),
                    Error::SensorReadFailed => {
                        writeln!(out, "[ERROR] Could not read the MPU6050.")
                    }
                    _ => writeln!(out, "[ERROR] Could not write to the file. Mount the card."),
                };
                Err(self.report(e, None, Color::Yellow, out))
            }
        }
    }

    /// Run a single key action with its display banners
    pub fn run_shortcut<W: Write>(
        &mut self,
        shortcut: Shortcut,
        out: &mut W,
    ) -> Result<(), Error> {
        let intro = match shortcut {
            Shortcut::Mount => "\nMounting the SD card...\n",
            Shortcut::Unmount => "\nUnmounting the SD card. Please wait...\n",
            Shortcut::List => "\nListing files on the SD card.\n",
            Shortcut::FreeSpace => "\nGetting free space on the SD card.\n\n",
            Shortcut::Format => "\nFormatting of the SD card started. Please wait...\n",
            Shortcut::ReadCapture | Shortcut::Capture | Shortcut::Help => "",
        };
        let _ = out.write_str(intro);
        self.show(shortcut.busy_banner());

        let result = match shortcut {
            Shortcut::Mount => self.mount(None, out),
            Shortcut::Unmount => self.unmount(None, out),
            Shortcut::List => self.list(None, out),
            Shortcut::ReadCapture => self.read_capture_file(out),
            Shortcut::FreeSpace => self.free_space(None, out),
            Shortcut::Capture => self.capture(out).map(|_| ()),
            Shortcut::Format => self.format(None, out),
            Shortcut::Help => {
                self.help(out);
                return Ok(());
            }
        };

        if let Some(done) = shortcut.done_banner() {
            let banner = if result.is_ok() { done } else { Banner::FAILED };
            self.show(banner);
        }
        if result.is_ok() {
            let outro = match shortcut {
                Shortcut::List => "\nListing complete.\n",
                Shortcut::FreeSpace => "\nFree space obtained.\n",
                Shortcut::Format => "\nFormatting complete.\n\n",
                _ => "",
            };
            let _ = out.write_str(outro);
        }
        let _ = out.write_str(CHOOSE_HINT);
        result
    }

    /// Capture requested with button A
    pub fn button_capture<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
        self.show(Banner::BUTTON_CAPTURE);
        let result = self.capture(out).map(|_| ());
        let banner = match result {
            Ok(()) => Banner::BUTTON_CAPTURE_DONE,
            Err(_) => Banner::FAILED,
        };
        self.show(banner);
        if result.is_ok() {
            let _ = writeln!(out, "[INFO] Data captured via button A.");
        }
        let _ = out.write_str(CHOOSE_HINT);
        result
    }
}
