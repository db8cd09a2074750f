//! Directory listing structures

use std::fmt;

use chrono::{DateTime, Utc};

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Map the raw type byte of a listing record (0 = file, anything else = directory)
    pub fn from_type_byte(value: u8) -> Self {
        if value == 0 {
            Self::File
        } else {
            Self::Directory
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("FILE"),
            Self::Directory => f.write_str("DIR"),
        }
    }
}

/// One record of a remote directory listing
///
/// Entries are produced by the listing engine and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry name (no path components)
    pub name: String,

    /// Size in bytes as reported by the device
    pub size: u32,

    /// Device clock value of the last modification (opaque)
    pub modified: u32,

    /// File or directory
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, size: u32, modified: u32, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            size,
            modified,
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Interpret the modification value as Unix seconds.
    ///
    /// The device clock is not guaranteed to be synchronized with the host,
    /// so treat the result as a hint.
    pub fn modified_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.modified), 0)
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({} bytes)", self.kind, self.name, self.size)
    }
}
