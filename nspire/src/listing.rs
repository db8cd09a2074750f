//! Directory listing

use tracing::{debug, info, trace};

use nspire_core::constants::DEFAULT_READ_LEN;
use nspire_core::{packet, Command, Error as ProtocolError};
use nspire_transport::Transport;
use nspire_types::DirectoryEntry;

use crate::error::Result;
use crate::service::ServiceSession;

impl<T: Transport + ?Sized> ServiceSession<'_, T> {
    /// List the directory at `path`
    ///
    /// Requests entries one at a time until the device sends the
    /// end-of-listing frame. Entries come back in device order.
    ///
    /// There is no entry limit; a device that never terminates the listing
    /// is only stopped by the read timeout.
    pub async fn list_directory(&mut self, path: &str) -> Result<Vec<DirectoryEntry>> {
        self.ensure_connected()?;

        let request = packet::encode_command(Command::ListDir, path, &[])?;
        let next = packet::encode_opcode(Command::NextEntry);

        info!("Listing directory: {}", path);

        self.send(&request).await?;
        let ack = self.receive(DEFAULT_READ_LEN, self.timeouts().ack_read).await?;
        trace!("Listing ack: {:02X?}", &ack[..]);

        let mut entries = Vec::new();

        loop {
            self.send(&next).await?;
            let frame = self.receive(DEFAULT_READ_LEN, self.timeouts().ack_read).await?;

            if frame.is_empty() {
                return Err(ProtocolError::MalformedEntry {
                    len: 0,
                    reason: "empty listing frame",
                }
                .into());
            }

            if packet::is_end_of_listing(&frame) {
                break;
            }

            let entry = packet::decode_entry(&frame)?;
            debug!("Found: {}", entry);
            entries.push(entry);
        }

        info!("Listed {} entries in {}", entries.len(), path);
        Ok(entries)
    }
}
