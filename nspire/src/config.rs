//! Per-call timeout configuration

use std::time::Duration;

/// Timeouts applied to individual bulk calls
///
/// Short control frames and bulk data get separate budgets in both
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Control frame writes (connect, init, listing, markers)
    pub write: Duration,

    /// Upload data chunk writes
    pub data_write: Duration,

    /// Reads of short control replies (service ack, upload init, listing)
    pub ack_read: Duration,

    /// Reads of file headers, data chunks and upload confirmation
    pub data_read: Duration,
}

impl Timeouts {
    pub const DEFAULT_WRITE: Duration = Duration::from_millis(2000);
    pub const DEFAULT_DATA_WRITE: Duration = Duration::from_millis(5000);
    pub const DEFAULT_ACK_READ: Duration = Duration::from_millis(3000);
    pub const DEFAULT_DATA_READ: Duration = Duration::from_millis(10_000);

    /// Use the same timeout for every call
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            write: timeout,
            data_write: timeout,
            ack_read: timeout,
            data_read: timeout,
        }
    }

    pub fn with_write(mut self, timeout: Duration) -> Self {
        self.write = timeout;
        self
    }

    pub fn with_data_write(mut self, timeout: Duration) -> Self {
        self.data_write = timeout;
        self
    }

    pub fn with_ack_read(mut self, timeout: Duration) -> Self {
        self.ack_read = timeout;
        self
    }

    pub fn with_data_read(mut self, timeout: Duration) -> Self {
        self.data_read = timeout;
        self
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            write: Self::DEFAULT_WRITE,
            data_write: Self::DEFAULT_DATA_WRITE,
            ack_read: Self::DEFAULT_ACK_READ,
            data_read: Self::DEFAULT_DATA_READ,
        }
    }
}
