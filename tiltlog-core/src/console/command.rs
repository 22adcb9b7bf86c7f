//! Command table and line parsing

/// Whitespace separated arguments following the command name
///
/// Only the space character separates tokens; runs of spaces never yield
/// empty tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args<'a> {
    rest: &'a str,
}

impl<'a> Args<'a> {
    pub fn new(rest: &'a str) -> Self {
        Self { rest }
    }
}

impl<'a> Iterator for Args<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start_matches(' ');
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed.find(' ').unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

/// A recognised console command with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `setrtc DD MM YY hh mm ss`
    SetRtc(Args<'a>),
    /// `format [volume]`
    Format(Option<&'a str>),
    /// `mount [volume]`
    Mount(Option<&'a str>),
    /// `unmount [volume]`
    Unmount(Option<&'a str>),
    /// `getfree [volume]`
    GetFree(Option<&'a str>),
    /// `ls [path]`
    Ls(Option<&'a str>),
    /// `cat filename`
    Cat(Option<&'a str>),
    /// `help`
    Help,
}

/// Name and help text of one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub help: &'static str,
}

/// Commands in lookup order
pub const COMMANDS: [CommandInfo; 8] = [
    CommandInfo {
        name: "setrtc",
        help: "setrtc <DD> <MM> <YY> <hh> <mm> <ss>: Set Real Time Clock",
    },
    CommandInfo {
        name: "format",
        help: "format [<drive#:>]: Format the SD card",
    },
    CommandInfo {
        name: "mount",
        help: "mount [<drive#:>]: Mount the SD card",
    },
    CommandInfo {
        name: "unmount",
        help: "unmount <drive#:>: Unmount the SD card",
    },
    CommandInfo {
        name: "getfree",
        help: "getfree [<drive#:>]: Free space",
    },
    CommandInfo {
        name: "ls",
        help: "ls [<path>]: List files",
    },
    CommandInfo {
        name: "cat",
        help: "cat <filename>: Show file contents",
    },
    CommandInfo {
        name: "help",
        help: "help: Show available commands",
    },
];

impl<'a> Command<'a> {
    /// Build a command from its name and the arguments that follow it
    pub fn lookup(name: &str, mut args: Args<'a>) -> Option<Self> {
        let command = match name {
            "setrtc" => Command::SetRtc(args),
            "format" => Command::Format(args.next()),
            "mount" => Command::Mount(args.next()),
            "unmount" => Command::Unmount(args.next()),
            "getfree" => Command::GetFree(args.next()),
            "ls" => Command::Ls(args.next()),
            "cat" => Command::Cat(args.next()),
            "help" => Command::Help,
            _ => return None,
        };
        Some(command)
    }
}

/// Single key actions mirroring the commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shortcut {
    Mount,
    Unmount,
    List,
    ReadCapture,
    FreeSpace,
    Capture,
    Format,
    Help,
}

impl Shortcut {
    pub const ALL: [Shortcut; 8] = [
        Shortcut::Mount,
        Shortcut::Unmount,
        Shortcut::List,
        Shortcut::ReadCapture,
        Shortcut::FreeSpace,
        Shortcut::Capture,
        Shortcut::Format,
        Shortcut::Help,
    ];

    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            b'a'..=b'h' => Some(Self::ALL[(key - b'a') as usize]),
            _ => None,
        }
    }

    pub fn key(&self) -> char {
        match self {
            Shortcut::Mount => 'a',
            Shortcut::Unmount => 'b',
            Shortcut::List => 'c',
            Shortcut::ReadCapture => 'd',
            Shortcut::FreeSpace => 'e',
            Shortcut::Capture => 'f',
            Shortcut::Format => 'g',
            Shortcut::Help => 'h',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Shortcut::Mount => "mount the SD card",
            Shortcut::Unmount => "unmount the SD card",
            Shortcut::List => "list files",
            Shortcut::ReadCapture => "show the capture file",
            Shortcut::FreeSpace => "get free space on the SD card",
            Shortcut::Capture => "capture MPU6050 data and save it to the file",
            Shortcut::Format => "format the SD card",
            Shortcut::Help => "show available commands",
        }
    }
}

/// Result of parsing a completed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<'a> {
    /// No tokens on the line
    Empty,
    /// Line made of a single shortcut key
    Shortcut(Shortcut),
    Command(Command<'a>),
    /// First token is not a known command
    NotFound(&'a str),
}

/// Tokenize a line and resolve its first token
pub fn parse_line(line: &str) -> Parsed<'_> {
    if let [key] = line.as_bytes() {
        if let Some(shortcut) = Shortcut::from_key(*key) {
            return Parsed::Shortcut(shortcut);
        }
    }

    let mut args = Args::new(line);
    let Some(name) = args.next() else {
        return Parsed::Empty;
    };
    match Command::lookup(name, args) {
        Some(command) => Parsed::Command(command),
        None => Parsed::NotFound(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_split_on_spaces() {
        let args: heapless::Vec<&str, 8> = Args::new("  a  bb c ").collect();
        assert_eq!(args.as_slice(), &["a", "bb", "c"]);
        assert_eq!(Args::new("").next(), None);
        assert_eq!(Args::new("   ").next(), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("mount"), Parsed::Command(Command::Mount(None)));
        assert_eq!(
            parse_line("unmount 0:"),
            Parsed::Command(Command::Unmount(Some("0:")))
        );
        assert_eq!(
            parse_line("  getfree   0:  "),
            Parsed::Command(Command::GetFree(Some("0:")))
        );
        assert_eq!(parse_line("help extra"), Parsed::Command(Command::Help));
        assert_eq!(
            parse_line("cat LOG.TXT"),
            Parsed::Command(Command::Cat(Some("LOG.TXT")))
        );
        assert_eq!(parse_line("ls"), Parsed::Command(Command::Ls(None)));
    }

    #[test]
    fn test_setrtc_keeps_arguments() {
        let Parsed::Command(Command::SetRtc(args)) = parse_line("setrtc 1 2 3") else {
            panic!("expected setrtc");
        };
        let tokens: heapless::Vec<&str, 8> = args.collect();
        assert_eq!(tokens.as_slice(), &["1", "2", "3"]);
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(parse_line("Mount"), Parsed::NotFound("Mount"));
        assert_eq!(parse_line("mountx"), Parsed::NotFound("mountx"));
        assert_eq!(parse_line("moun"), Parsed::NotFound("moun"));
        // Tabs are not separators
        assert_eq!(parse_line("ls\t/"), Parsed::NotFound("ls\t/"));
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_line(""), Parsed::Empty);
        assert_eq!(parse_line("    "), Parsed::Empty);
    }

    #[test]
    fn test_shortcuts_only_as_whole_line() {
        assert_eq!(parse_line("a"), Parsed::Shortcut(Shortcut::Mount));
        assert_eq!(parse_line("f"), Parsed::Shortcut(Shortcut::Capture));
        assert_eq!(parse_line("h"), Parsed::Shortcut(Shortcut::Help));
        assert_eq!(parse_line("i"), Parsed::NotFound("i"));
        assert_eq!(parse_line(" a"), Parsed::NotFound("a"));
    }

    #[test]
    fn test_shortcut_keys_round_trip() {
        for shortcut in Shortcut::ALL {
            assert_eq!(Shortcut::from_key(shortcut.key() as u8), Some(shortcut));
        }
    }

    #[test]
    fn test_table_order() {
        let names: heapless::Vec<&str, 8> = COMMANDS.iter().map(|c| c.name).collect();
        assert_eq!(
            names.as_slice(),
            &["setrtc", "format", "mount", "unmount", "getfree", "ls", "cat", "help"]
        );
    }
}
