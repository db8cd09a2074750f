//! # nspire
//!
//! Rust client for the TI-Nspire USB file service.
//!
//! ## Features
//!
//! - Directory listing
//! - File upload and download in 253-byte chunks
//! - Service sessions that always disconnect, even on error
//! - Separate transport and protocol error branches
//! - Pluggable protocol observer for wire dumps and progress
//!
//! ## Quick Start
//!
//! ```no_run
//! use nspire::Calculator;
//!
//! #[tokio::main]
//! async fn main() -> nspire::Result<()> {
//!     // Open the first calculator on the bus
//!     let mut calc = Calculator::open_usb()?;
//!
//!     // Upload a file
//!     calc.upload_file("/documents/hello.txt", b"hello").await?;
//!
//!     // Read it back
//!     let data = calc.download_file("/documents/hello.txt").await?;
//!     assert_eq!(&data[..], b"hello");
//!
//!     // Release the device
//!     calc.release().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod calculator;
pub mod config;
pub mod error;
mod listing;
pub mod observer;
pub mod service;
mod transfer;

// Re-exports
pub use calculator::Calculator;
pub use config::Timeouts;
pub use error::{Error, Result};
pub use observer::{ProtocolObserver, TracingObserver};
pub use service::ServiceSession;

// Re-export types
pub use nspire_core::constants::SERVICE_FILE;
pub use nspire_core::{Command, SessionState};
pub use nspire_transport::{Transport, UsbTransport};
pub use nspire_types::{DirectoryEntry, EntryKind, FileTransferContext, TransferDirection};
