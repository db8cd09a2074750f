//! Protocol milestone callbacks
//!
//! The protocol engines report what they do through a [`ProtocolObserver`]
//! instead of logging inline. The default observer forwards everything to
//! `tracing`; callers can plug in their own for progress bars or wire dumps.

use tracing::{debug, trace};

use nspire_core::SessionState;
use nspire_types::FileTransferContext;

/// Receives protocol milestones
///
/// All methods have empty defaults so implementors pick what they need.
/// Callbacks run inline on the protocol path and must not block.
pub trait ProtocolObserver: Send + Sync {
    /// A frame was written to the device
    fn frame_sent(&self, _data: &[u8]) {}

    /// A frame was read from the device
    fn frame_received(&self, _data: &[u8]) {}

    /// The service session changed state
    fn state_changed(&self, _service_id: u16, _from: SessionState, _to: SessionState) {}

    /// A data chunk of a file transfer went through
    fn transfer_progress(&self, _transfer: &FileTransferContext) {}
}

/// Observer that emits `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProtocolObserver for TracingObserver {
    fn frame_sent(&self, data: &[u8]) {
        trace!(len = data.len(), frame = %hex::encode(data), "frame sent");
    }

    fn frame_received(&self, data: &[u8]) {
        trace!(len = data.len(), frame = %hex::encode(data), "frame received");
    }

    fn state_changed(&self, service_id: u16, from: SessionState, to: SessionState) {
        debug!(
            service = format!("0x{:04X}", service_id),
            "Service session {:?} -> {:?}", from, to
        );
    }

    fn transfer_progress(&self, transfer: &FileTransferContext) {
        trace!(
            path = %transfer.remote_path,
            transferred = transfer.transferred(),
            total = transfer.total_size,
            "transfer progress"
        );
    }
}
