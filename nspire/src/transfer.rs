//! File upload and download
//!
//! Both directions run inside a connected file service session:
//!
//! ```text
//! upload:   WRITE_INIT(path, size) -> proceed?  -> 0x05+chunk ... -> confirm?
//! download: READ_INIT(path)        -> header?   -> 0x04 -> chunk ... -> 0xFF00
//! ```

use bytes::{Bytes, BytesMut};
use tracing::{debug, info};

use nspire_core::constants::{download, upload, DEFAULT_READ_LEN};
use nspire_core::{packet, Command, Error as ProtocolError};
use nspire_transport::Transport;
use nspire_types::FileTransferContext;

use crate::error::Result;
use crate::service::ServiceSession;

impl<T: Transport + ?Sized> ServiceSession<'_, T> {
    /// Upload `data` to `remote_path`
    ///
    /// The session must already be connected to the file service; the
    /// session is left connected whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `SessionNotConnected` before any I/O if no service is connected
    /// - `TransferRejected` if the device refuses the init frame
    /// - `TransferNotConfirmed` if the final reply lacks the completion marker
    pub async fn upload(&mut self, remote_path: &str, data: &[u8]) -> Result<()> {
        self.ensure_connected()?;

        let total = u32::try_from(data.len())
            .map_err(|_| ProtocolError::FileTooLarge { size: data.len() })?;
        let init = packet::encode_command(Command::WriteInit, remote_path, &total.to_be_bytes())?;

        info!("Uploading '{}' ({} bytes)", remote_path, total);

        self.send(&init).await?;
        let reply = self.receive(DEFAULT_READ_LEN, self.timeouts().ack_read).await?;

        if !packet::is_upload_accepted(&reply) {
            return Err(ProtocolError::TransferRejected {
                path: remote_path.to_owned(),
                response: hex::encode(&reply),
            }
            .into());
        }

        let mut transfer = FileTransferContext::upload(remote_path, total);

        for chunk in data.chunks(upload::MAX_CHUNK_PAYLOAD) {
            let frame = packet::encode_chunk(chunk)?;
            self.send_with(&frame, self.timeouts().data_write).await?;
            transfer.advance(chunk.len())?;
            self.observer().transfer_progress(&transfer);
        }

        debug!(
            "Sent {} chunks for '{}'",
            packet::chunk_count(data.len()),
            remote_path
        );

        let confirm = self.receive(DEFAULT_READ_LEN, self.timeouts().data_read).await?;

        if !packet::is_upload_confirmed(&confirm) {
            return Err(ProtocolError::TransferNotConfirmed {
                path: remote_path.to_owned(),
                response: hex::encode(&confirm),
            }
            .into());
        }

        info!("Uploaded '{}'", remote_path);
        Ok(())
    }

    /// Download the file at `remote_path`
    ///
    /// The session must already be connected to the file service; the
    /// session is left connected whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `SessionNotConnected` before any I/O if no service is connected
    /// - `FileNotFound` if the header reply is short or carries the wrong tag
    /// - `UnexpectedTimeout` if a data read comes back without data
    /// - `TransferOverrun` if the device sends more than it announced
    pub async fn download(&mut self, remote_path: &str) -> Result<Bytes> {
        self.ensure_connected()?;

        let request = packet::encode_command(Command::ReadInit, remote_path, &[])?;

        info!("Reading '{}'", remote_path);

        self.send(&request).await?;
        let header = self.receive(DEFAULT_READ_LEN, self.timeouts().data_read).await?;

        let total = packet::decode_file_header(&header).map_err(|e| {
            debug!("Read request for '{}' refused: {}", remote_path, e);
            ProtocolError::FileNotFound {
                path: remote_path.to_owned(),
            }
        })?;

        debug!("File size to read: {} bytes", total);

        self.send(&[download::BEGIN]).await?;

        let mut transfer = FileTransferContext::download(remote_path, total);
        // Announced size is unverified; grow past the initial reservation
        let mut data = BytesMut::with_capacity((total as usize).min(download::INITIAL_RESERVE));

        while !transfer.is_complete() {
            // +1 for the marker byte in front of every chunk
            let request_len = (transfer.remaining() as usize)
                .saturating_add(1)
                .min(download::MAX_FRAME);

            let frame = self.receive(request_len, self.timeouts().data_read).await?;

            if frame.len() <= 1 {
                return Err(ProtocolError::UnexpectedTimeout {
                    path: remote_path.to_owned(),
                    transferred: transfer.transferred(),
                    total,
                }
                .into());
            }

            let chunk = &frame[1..];
            if chunk.len() > transfer.remaining() as usize {
                return Err(ProtocolError::TransferOverrun {
                    path: remote_path.to_owned(),
                    received: chunk.len(),
                    remaining: transfer.remaining(),
                }
                .into());
            }

            transfer.advance(chunk.len())?;
            data.extend_from_slice(chunk);
            self.observer().transfer_progress(&transfer);
        }

        self.send(&download::COMPLETE_ACK.to_be_bytes()).await?;

        info!("Read '{}' ({} bytes)", remote_path, data.len());
        Ok(data.freeze())
    }
}

