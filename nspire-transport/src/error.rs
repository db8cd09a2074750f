//! Transport errors

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Device {vendor_id:04x}:{product_id:04x} not found")]
    DeviceNotFound {
        vendor_id: u16,
        product_id: u16,
    },
    
    #[error("Transport not open")]
    NotOpen,
    
    #[error("Write timeout after {0:?}")]
    WriteTimeout(Duration),
    
    #[error("Read timeout after {0:?}")]
    ReadTimeout(Duration),
    
    #[error("Short write: {written} of {expected} bytes")]
    ShortWrite {
        expected: usize,
        written: usize,
    },
    
    #[error("USB transfer error: {0}")]
    Usb(#[from] nusb::transfer::TransferError),
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if a bulk call ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WriteTimeout(_) | Self::ReadTimeout(_))
    }
}
