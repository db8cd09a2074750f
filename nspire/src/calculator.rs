//! High-level calculator interface

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use nspire_core::constants::SERVICE_FILE;
use nspire_transport::{Transport, UsbTransport};
use nspire_types::DirectoryEntry;

use crate::config::Timeouts;
use crate::error::Result;
use crate::observer::{ProtocolObserver, TracingObserver};
use crate::service::ServiceSession;

/// TI-Nspire calculator
///
/// Owns the transport and runs every operation inside its own file service
/// session, which is disconnected again on every exit path.
///
/// # Examples
///
/// ```no_run
/// use nspire::Calculator;
///
/// #[tokio::main]
/// async fn main() -> nspire::Result<()> {
///     let mut calc = Calculator::open_usb()?;
///
///     for entry in calc.list_directory("/documents").await? {
///         println!("{}", entry);
///     }
///
///     let data = calc.download_file("/documents/examples/test.tns").await?;
///     println!("{} bytes", data.len());
///
///     calc.release().await?;
///     Ok(())
/// }
/// ```
pub struct Calculator {
    transport: Box<dyn Transport>,
    timeouts: Timeouts,
    observer: Arc<dyn ProtocolObserver>,
}

impl Calculator {
    /// Wrap an already opened transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_boxed(Box::new(transport))
    }

    /// Wrap an already boxed transport
    pub fn from_boxed(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            timeouts: Timeouts::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Open the first calculator on the USB bus
    pub fn open_usb() -> Result<Self> {
        Ok(Self::new(UsbTransport::open()?))
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

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Check if the transport is still held
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Upload `data` to `remote_path`
    pub async fn upload_file(&mut self, remote_path: &str, data: &[u8]) -> Result<()> {
        let mut service = self.file_service().await?;
        let result = service.upload(remote_path, data).await;
        service.finish(result).await
    }

    /// Download the file at `remote_path`
    pub async fn download_file(&mut self, remote_path: &str) -> Result<Bytes> {
        let mut service = self.file_service().await?;
        let result = service.download(remote_path).await;
        service.finish(result).await
    }

    /// List the directory at `path`
    pub async fn list_directory(&mut self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let mut service = self.file_service().await?;
        let result = service.list_directory(path).await;
        service.finish(result).await
    }

    /// Release the transport
    ///
    /// No session can be open at this point: every operation disconnects
    /// before returning.
    pub async fn release(&mut self) -> Result<()> {
        if !self.transport.is_open() {
            return Ok(());
        }

        info!("Releasing {}...", self.transport.description());
        self.transport.release().await?;

        Ok(())
    }

    async fn file_service(&mut self) -> Result<ServiceSession<'_, dyn Transport>> {
        debug!("Opening file service on {}", self.transport.description());

        let mut service = ServiceSession::new(self.transport.as_mut())
            .with_timeouts(self.timeouts)
            .with_observer(Arc::clone(&self.observer));

        service.connect(SERVICE_FILE).await?;
        Ok(service)
    }
}
