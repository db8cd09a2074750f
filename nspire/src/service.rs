//! Service session over a borrowed transport
//!
//! A [`ServiceSession`] frames the connect/disconnect handshake around one
//! service and carries the per-call timeouts and observer used by the file
//! transfer and directory listing engines.

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, warn};

use nspire_core::constants::{DEFAULT_READ_LEN, DISCONNECT_MARKER};
use nspire_core::{packet, Session, SessionState};
use nspire_transport::Transport;

use crate::config::Timeouts;
use crate::error::Result;
use crate::observer::{ProtocolObserver, TracingObserver};

/// Logical connection to one service on the calculator
///
/// Borrows the transport exclusively, so only one session can be active on
/// a transport at a time and a session cannot outlive it. The borrow lasts
/// until the session is dropped.
///
/// # Examples
///
/// ```no_run
/// use nspire::{ServiceSession, UsbTransport, SERVICE_FILE};
/// use nspire::Transport;
///
/// #[tokio::main]
/// async fn main() -> nspire::Result<()> {
///     let mut transport = UsbTransport::open()?;
///
///     let mut service = ServiceSession::new(&mut transport);
///     service.connect(SERVICE_FILE).await?;
///     let result = service.list_directory("/").await;
///     let entries = service.finish(result).await?;
///     println!("{} entries", entries.len());
///     drop(service);
///
///     transport.release().await?;
///     Ok(())
/// }
/// ```
pub struct ServiceSession<'t, T: Transport + ?Sized> {
    transport: &'t mut T,
    session: Session,
    timeouts: Timeouts,
    observer: Arc<dyn ProtocolObserver>,
}

impl<'t, T: Transport + ?Sized> ServiceSession<'t, T> {
    /// Create a disconnected session on `transport`
    pub fn new(transport: &'t mut T) -> Self {
        Self {
            transport,
            session: Session::new(),
            timeouts: Timeouts::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Set per-call timeouts
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the milestone observer
    pub fn with_observer(mut self, observer: Arc<dyn ProtocolObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Connected service ID (0 when disconnected)
    pub fn service_id(&self) -> u16 {
        self.session.service_id()
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Connect to a service
    ///
    /// Sends the 2-byte service ID and waits for one reply frame. The reply
    /// content is not interpreted; an empty reply means the device did not
    /// take the service.
    ///
    /// # Errors
    ///
    /// Fails without any I/O if a service is already connected.
    pub async fn connect(&mut self, service_id: u16) -> Result<()> {
        self.session.ensure_disconnected()?;

        debug!("Connecting service 0x{:04X}...", service_id);

        self.send(&packet::encode_service(service_id)).await?;
        let reply = self.receive(DEFAULT_READ_LEN, self.timeouts.ack_read).await?;

        if reply.is_empty() {
            return Err(nspire_core::Error::ServiceNotAcknowledged { service_id }.into());
        }

        self.session.open(service_id)?;
        self.observer
            .state_changed(service_id, SessionState::Disconnected, SessionState::Connected);

        Ok(())
    }

    /// Disconnect from the current service
    ///
    /// The session is considered disconnected as soon as this is called,
    /// whether or not the marker reaches the device. Does nothing when no
    /// service is connected.
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.session.is_connected() {
            return Ok(());
        }

        let service_id = self.session.service_id();
        let previous = self.session.close();
        self.observer
            .state_changed(service_id, previous, SessionState::Disconnected);

        debug!("Disconnecting service 0x{:04X}", service_id);

        self.send(&[DISCONNECT_MARKER]).await
    }

    /// Disconnect, then hand back the operation result
    ///
    /// If the operation failed, its error wins and a disconnect failure is
    /// only logged. If it succeeded, a disconnect failure is returned.
    pub async fn finish<R>(&mut self, result: Result<R>) -> Result<R> {
        match result {
            Ok(value) => {
                self.disconnect().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(disconnect_err) = self.disconnect().await {
                    warn!(
                        "Disconnect after failed operation also failed: {}",
                        disconnect_err
                    );
                }
                Err(e)
            }
        }
    }

    pub(crate) fn ensure_connected(&self) -> Result<()> {
        self.session.ensure_connected()?;
        Ok(())
    }

    pub(crate) fn observer(&self) -> &dyn ProtocolObserver {
        self.observer.as_ref()
    }

    /// Write one control frame, failing on a short write
    pub(crate) async fn send(&mut self, frame: &[u8]) -> Result<()> {
        let timeout = self.timeouts.write;
        self.send_with(frame, timeout).await
    }

    /// Write one frame under an explicit timeout
    pub(crate) async fn send_with(&mut self, frame: &[u8], timeout: Duration) -> Result<()> {
        let written = self.transport.write(frame, timeout).await?;

        if written != frame.len() {
            return Err(nspire_transport::Error::ShortWrite {
                expected: frame.len(),
                written,
            }
            .into());
        }

        self.observer.frame_sent(frame);
        Ok(())
    }

    /// Read one frame of at most `max_len` bytes
    pub(crate) async fn receive(&mut self, max_len: usize, timeout: Duration) -> Result<BytesMut> {
        let frame = self.transport.read(max_len, timeout).await?;
        self.observer.frame_received(&frame);
        Ok(frame)
    }
}

impl<T: Transport + ?Sized> Drop for ServiceSession<'_, T> {
    fn drop(&mut self) {
        if self.session.is_connected() {
            warn!(
                "Service session 0x{:04X} dropped while still connected",
                self.session.service_id()
            );
        }
    }
}
