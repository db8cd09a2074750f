//! Error types for nspire-core



/// Result type alias for nspire protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Protocol-level errors
///
/// None of these are produced by the transport; a transport fault is never
/// reported as one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote path cannot be NUL-terminated unambiguously
    #[error("Invalid remote path {path:?}: {reason}")]
    InvalidPath {
        path: String,
        reason: &'static str,
    },

    /// Upload chunk exceeds the per-packet payload limit
    #[error("Chunk too large: {size} bytes (max: {max} bytes)")]
    ChunkTooLarge {
        size: usize,
        max: usize,
    },

    /// Local data does not fit the 32-bit size field
    #[error("File too large for the device: {size} bytes")]
    FileTooLarge {
        size: usize,
    },

    /// Response header or tag does not match what the request expects
    #[error("Protocol mismatch: {0}")]
    ProtocolMismatch(String),

    /// Directory entry record cannot be parsed
    #[error("Malformed directory entry ({len} bytes): {reason}")]
    MalformedEntry {
        len: usize,
        reason: &'static str,
    },

    /// Device refused an upload
    #[error("Device rejected upload of '{path}' (response: {response})")]
    TransferRejected {
        path: String,
        response: String,
    },

    /// Upload completion marker missing or wrong
    #[error("Device did not confirm upload of '{path}' (response: {response})")]
    TransferNotConfirmed {
        path: String,
        response: String,
    },

    /// Download header invalid or too short
    #[error("File not found or invalid read response: '{path}'")]
    FileNotFound {
        path: String,
    },

    /// Device stopped sending data mid-transfer
    #[error("Transfer of '{path}' stalled at {transferred}/{total} bytes")]
    UnexpectedTimeout {
        path: String,
        transferred: u32,
        total: u32,
    },

    /// Device sent more data than it announced
    #[error("Transfer of '{path}' overran: {received} bytes received with {remaining} remaining")]
    TransferOverrun {
        path: String,
        received: usize,
        remaining: u32,
    },

    /// Service connect got no reply
    #[error("Service 0x{service_id:04X} not acknowledged by device")]
    ServiceNotAcknowledged {
        service_id: u16,
    },

    /// Command issued outside a connected service
    #[error("Session not connected - connect to a service first")]
    SessionNotConnected,

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}
