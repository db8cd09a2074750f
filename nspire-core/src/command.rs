//! File service command codes

use std::fmt;

/// Requests understood by the file service
///
/// Transfer commands go out as a 2-byte big-endian opcode, listing
/// commands as a single byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    /// Begin a file upload
    WriteInit = 0x0301,

    /// Begin a file download
    ReadInit = 0x0701,

    /// Begin a directory listing
    ListDir = 0x0D,

    /// Request the next directory entry
    NextEntry = 0x0E,
}

impl Command {
    /// Number of opcode bytes on the wire
    pub fn opcode_len(self) -> usize {
        match self {
            Self::WriteInit | Self::ReadInit => 2,
            Self::ListDir | Self::NextEntry => 1,
        }
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::WriteInit => "WRITE_INIT",
            Self::ReadInit => "READ_INIT",
            Self::ListDir => "LIST_DIR",
            Self::NextEntry => "NEXT_ENTRY",
        }
    }
}

impl From<Command> for u16 {
    fn from(cmd: Command) -> u16 {
        cmd as u16
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:04X})", self.name(), *self as u16)
    }
}
