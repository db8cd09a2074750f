//! File transfer bookkeeping

use std::fmt;

use crate::error::{Error, Result};

/// Direction of a file transfer, seen from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Upload,
    Download,
}

/// Progress of one upload or download
///
/// `transferred` only moves forward and never passes `total_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransferContext {
    pub remote_path: String,
    pub direction: TransferDirection,
    pub total_size: u32,
    transferred: u32,
}

impl FileTransferContext {
    /// Start tracking an upload of `total_size` bytes
    pub fn upload(remote_path: impl Into<String>, total_size: u32) -> Self {
        Self {
            remote_path: remote_path.into(),
            direction: TransferDirection::Upload,
            total_size,
            transferred: 0,
        }
    }

    /// Start tracking a download whose size was announced by the device
    pub fn download(remote_path: impl Into<String>, total_size: u32) -> Self {
        Self {
            remote_path: remote_path.into(),
            direction: TransferDirection::Download,
            total_size,
            transferred: 0,
        }
    }

    pub fn transferred(&self) -> u32 {
        self.transferred
    }

    pub fn remaining(&self) -> u32 {
        self.total_size - self.transferred
    }

    pub fn is_complete(&self) -> bool {
        self.transferred == self.total_size
    }

    /// Completion in percent (an empty transfer counts as done)
    pub fn percent(&self) -> f64 {
        if self.total_size == 0 {
            return 100.0;
        }
        f64::from(self.transferred) * 100.0 / f64::from(self.total_size)
    }

    /// Record `len` more bytes as transferred
    ///
    /// # Errors
    ///
    /// A zero-length step or a step past `total_size` is rejected; the
    /// context is left unchanged.
    pub fn advance(&mut self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::Validation(format!(
                "transfer of '{}' made no progress at {}/{} bytes",
                self.remote_path, self.transferred, self.total_size
            )));
        }

        let remaining = self.remaining() as usize;
        if len > remaining {
            return Err(Error::Validation(format!(
                "transfer of '{}' overran by {} bytes",
                self.remote_path,
                len - remaining
            )));
        }

        // len <= remaining <= u32::MAX
        self.transferred += len as u32;
        Ok(())
    }
}

impl fmt::Display for FileTransferContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.direction {
            TransferDirection::Upload => "upload",
            TransferDirection::Download => "download",
        };
        write!(
            f,
            "{} {} [{}/{}]",
            verb, self.remote_path, self.transferred, self.total_size
        )
    }
}
