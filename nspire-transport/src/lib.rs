//! Transport layer for the TI-Nspire protocol
//!
//! Provides raw bulk I/O with the calculator. Device discovery, kernel
//! driver detachment and interface claiming all happen here, before a
//! transport is handed to the protocol layer.

pub mod error;
pub mod usb;

pub use error::{Error, Result};
pub use usb::UsbTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for raw bulk communication
///
/// Every call carries its own timeout. Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one bulk frame, returning the number of bytes accepted
    async fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize>;
    
    /// Read one bulk frame of at most `max_len` bytes
    ///
    /// A zero-length completion is returned as an empty buffer.
    async fn read(&mut self, max_len: usize, timeout: Duration) -> Result<BytesMut>;
    
    /// Release the underlying device
    async fn release(&mut self) -> Result<()>;
    
    /// Check if the device is still held
    fn is_open(&self) -> bool;
    
    /// Human-readable device location
    fn description(&self) -> String;
}
