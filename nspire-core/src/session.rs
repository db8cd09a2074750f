//! Service session state
//!
//! A session represents a logical connection to one service on the device
//! and tracks:
//! - Service ID (0 when not connected)
//! - Connection state
//!
//! Sending the connect/disconnect frames is up to the caller; this type only
//! enforces the state machine.

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No service selected
    Disconnected,

    /// Service selected, commands may be issued
    Connected,
}

/// Session state tracker
///
/// Owned by exactly one service session; transitions take `&mut self`.
#[derive(Debug)]
pub struct Session {
    service_id: u16,
    state: SessionState,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            service_id: 0,
            state: SessionState::Disconnected,
        }
    }

    /// Get current service ID
    pub fn service_id(&self) -> u16 {
        self.service_id
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    /// Fail unless a service is connected
    pub fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::SessionNotConnected);
        }
        Ok(())
    }

    /// Check that a connect may be attempted
    pub fn ensure_disconnected(&self) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot connect service from state {:?} (service 0x{:04X})",
                self.state, self.service_id
            )));
        }
        Ok(())
    }

    /// Mark the service as connected once the device has replied
    pub fn open(&mut self, service_id: u16) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot open service 0x{:04X} from state: {:?}",
                service_id, self.state
            )));
        }

        self.service_id = service_id;
        self.state = SessionState::Connected;

        Ok(())
    }

    /// Close session
    ///
    /// Unconditional: a closed session stays closed even if the device never
    /// saw the disconnect marker.
    pub fn close(&mut self) -> SessionState {
        let previous = self.state;
        self.service_id = 0;
        self.state = SessionState::Disconnected;
        previous
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
