//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by calculator operations
///
/// Transport and protocol failures are kept on separate branches: a
/// transport error may be worth retrying by the caller, a protocol error
/// means the device answered something this client cannot accept.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Protocol error: {0}")]
    Protocol(#[from] nspire_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] nspire_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] nspire_types::Error),
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
    
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
    
    /// Check if a bulk write or read timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
    
    /// Check if error is recoverable (a caller-level retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport(
                nspire_transport::Error::WriteTimeout(_)
                    | nspire_transport::Error::ReadTimeout(_)
                    | nspire_transport::Error::ShortWrite { .. }
            )
        )
    }
}
