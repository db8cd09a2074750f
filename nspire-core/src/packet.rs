//! File service frame encoding/decoding
//!
//! Everything here is pure: frames are built into `BytesMut` and responses
//! are parsed from byte slices. No I/O happens in this module.

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, BytesMut};
use tracing::trace;

use nspire_types::{DirectoryEntry, EntryKind};

use crate::{
    command::Command,
    constants::{download, listing, upload},
    error::{Error, Result},
};

/// Encode a path-bearing command frame
///
/// # Frame Structure
///
/// ```text
/// ┌───────────────┬──────────────────┬──────┬───────────────┐
/// │    Opcode     │   Remote path    │ NUL  │    Payload    │
/// │ 1 or 2 bytes  │   UTF-8 bytes    │ 0x00 │   N bytes     │
/// │   (BE u16)    │                  │      │               │
/// └───────────────┴──────────────────┴──────┴───────────────┘
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if `path` contains an embedded NUL, which
/// would make the terminator ambiguous.
///
/// # Examples
///
/// ```
/// use nspire_core::{packet, Command};
///
/// let frame = packet::encode_command(Command::WriteInit, "/a.tns", &10u32.to_be_bytes()).unwrap();
/// assert_eq!(&frame[..2], &[0x03, 0x01]);
/// assert_eq!(frame.len(), 2 + 6 + 1 + 4);
/// ```
pub fn encode_command(command: Command, path: &str, payload: &[u8]) -> Result<BytesMut> {
    validate_path(path)?;

    let mut buf = BytesMut::with_capacity(command.opcode_len() + path.len() + 1 + payload.len());

    match command.opcode_len() {
        2 => buf.put_u16(command.into()),
        _ => buf.put_u8(u16::from(command) as u8),
    }
    buf.put_slice(path.as_bytes());
    buf.put_u8(0);
    buf.put_slice(payload);

    trace!(command = %command, path, frame = %hex::encode(&buf), "Encoded command frame");

    Ok(buf)
}

/// Encode a single-byte request that carries no path
pub fn encode_opcode(command: Command) -> BytesMut {
    let mut buf = BytesMut::with_capacity(command.opcode_len());
    match command.opcode_len() {
        2 => buf.put_u16(command.into()),
        _ => buf.put_u8(u16::from(command) as u8),
    }
    buf
}

/// Encode the service selector sent on connect
pub fn encode_service(service_id: u16) -> [u8; 2] {
    service_id.to_be_bytes()
}

/// Encode one upload data chunk: marker byte followed by the payload
///
/// # Errors
///
/// Returns [`Error::ChunkTooLarge`] if `data` exceeds 253 bytes.
pub fn encode_chunk(data: &[u8]) -> Result<BytesMut> {
    if data.len() > upload::MAX_CHUNK_PAYLOAD {
        return Err(Error::ChunkTooLarge {
            size: data.len(),
            max: upload::MAX_CHUNK_PAYLOAD,
        });
    }

    let mut buf = BytesMut::with_capacity(1 + data.len());
    buf.put_u8(upload::CHUNK_MARKER);
    buf.put_slice(data);
    Ok(buf)
}

/// Number of chunk frames an upload of `len` bytes produces
pub fn chunk_count(len: usize) -> usize {
    len.div_ceil(upload::MAX_CHUNK_PAYLOAD)
}

/// Decode one directory entry record
///
/// # Record Structure
///
/// ```text
/// offset  0     1      2..4    4..8       8..12       12..
///       ┌─────┬──────┬───────┬──────────┬───────────┬───────────────┐
///       │  ?  │ type │   ?   │ size BE  │ mtime BE  │ name ... NUL  │
///       └─────┴──────┴───────┴──────────┴───────────┴───────────────┘
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedEntry`] if the record is shorter than 13 bytes,
/// the name has no NUL terminator, or the name is not UTF-8.
pub fn decode_entry(buf: &[u8]) -> Result<DirectoryEntry> {
    if buf.len() < listing::MIN_ENTRY_LEN {
        return Err(Error::MalformedEntry {
            len: buf.len(),
            reason: "record shorter than 13 bytes",
        });
    }

    let kind = EntryKind::from_type_byte(buf[1]);
    let size = BigEndian::read_u32(&buf[4..8]);
    let modified = BigEndian::read_u32(&buf[8..12]);

    let name_bytes = &buf[12..];
    let nul = name_bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::MalformedEntry {
            len: buf.len(),
            reason: "name is not NUL-terminated",
        })?;

    let name = std::str::from_utf8(&name_bytes[..nul]).map_err(|_| Error::MalformedEntry {
        len: buf.len(),
        reason: "name is not valid UTF-8",
    })?;

    Ok(DirectoryEntry::new(name, size, modified, kind))
}

/// Decode the header answering a read request and return the file size
///
/// # Errors
///
/// Returns [`Error::ProtocolMismatch`] if the header is shorter than 16 bytes
/// or does not start with the `0x0301` tag.
pub fn decode_file_header(buf: &[u8]) -> Result<u32> {
    if buf.len() < download::HEADER_LEN {
        return Err(Error::ProtocolMismatch(format!(
            "read header too short: expected at least {} bytes, got {}",
            download::HEADER_LEN,
            buf.len()
        )));
    }

    let tag = BigEndian::read_u16(&buf[0..2]);
    if tag != download::HEADER_TAG {
        return Err(Error::ProtocolMismatch(format!(
            "read header tag: expected 0x{:04X}, got 0x{:04X}",
            download::HEADER_TAG,
            tag
        )));
    }

    Ok(BigEndian::read_u32(&buf[12..16]))
}

/// Check the reply to an upload init
pub fn is_upload_accepted(buf: &[u8]) -> bool {
    buf.first() == Some(&upload::PROCEED)
}

/// Check the final reply of an upload
pub fn is_upload_confirmed(buf: &[u8]) -> bool {
    buf.ends_with(&upload::COMPLETE)
}

/// Check for the end-of-listing frame
pub fn is_end_of_listing(buf: &[u8]) -> bool {
    buf.first() == Some(&listing::END_MARKER)
}

fn validate_path(path: &str) -> Result<()> {
    if path.as_bytes().contains(&0) {
        return Err(Error::InvalidPath {
            path: path.to_owned(),
            reason: "embedded NUL byte",
        });
    }
    Ok(())
}
