//! Type definitions for nspire

pub mod entry;
pub mod error;
pub mod transfer;

pub use entry::{DirectoryEntry, EntryKind};
pub use error::{Error, Result};
pub use transfer::{FileTransferContext, TransferDirection};
