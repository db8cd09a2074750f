//! Protocol constants

/// Service identifier of the remote filesystem service
pub const SERVICE_FILE: u16 = 0x4060;

/// Sent to end the current service
pub const DISCONNECT_MARKER: u8 = 0x04;

/// Default number of bytes requested when reading a control frame
pub const DEFAULT_READ_LEN: usize = 512;

/// File upload markers
pub mod upload {
    /// Prefix of every upload data chunk
    pub const CHUNK_MARKER: u8 = 0x05;

    /// Maximum payload bytes per chunk (marker + payload fits a 254-byte packet)
    pub const MAX_CHUNK_PAYLOAD: usize = 253;

    /// Response byte 0 when the device accepts the upload
    pub const PROCEED: u8 = 0x04;

    /// Trailing bytes of the final response when the upload is stored
    pub const COMPLETE: [u8; 2] = [0xFF, 0x00];
}

/// File download markers
pub mod download {
    /// Tag at offset 0 of an accepted read-request header
    pub const HEADER_TAG: u16 = 0x0301;

    /// Minimum length of the header response
    pub const HEADER_LEN: usize = 16;

    /// Sent by the host once it is ready to receive data
    pub const BEGIN: u8 = 0x04;

    /// Sent by the host after the last data chunk
    pub const COMPLETE_ACK: u16 = 0xFF00;

    /// Largest frame the device sends during the data phase (marker + 253 bytes)
    pub const MAX_FRAME: usize = 254;

    /// Buffer reserved up front for a download, whatever the header announces
    pub const INITIAL_RESERVE: usize = 64 * 1024;
}

/// Directory listing markers
pub mod listing {
    /// Response byte 0 after the last entry
    pub const END_MARKER: u8 = 0xFF;

    /// Minimum length of an entry record (12 bytes of fields + NUL)
    pub const MIN_ENTRY_LEN: usize = 13;
}

/// USB identity of the TI-Nspire CX II family
pub mod usb {
    pub const VENDOR_ID: u16 = 0x0451;
    pub const PRODUCT_ID: u16 = 0xE022;

    pub const CONFIGURATION: u8 = 1;
    pub const INTERFACE: u8 = 0;

    /// Bulk IN (device -> host)
    pub const ENDPOINT_IN: u8 = 0x81;

    /// Bulk OUT (host -> device)
    pub const ENDPOINT_OUT: u8 = 0x01;
}
