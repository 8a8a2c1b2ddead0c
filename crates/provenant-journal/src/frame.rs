//! On-disk layout.
//!
//! ```text
//! header (16 bytes): magic "PVJ1" | version u16 LE | flags u16 LE | reserved [0; 8]
//! frame  (8 bytes):  kind u8 | reserved [0; 3] | len u32 LE, followed by `len` payload bytes
//! ```

use crate::errors::JournalError;

/// Journal file magic bytes: `b"PVJ1"`.
pub const MAGIC: &[u8; 4] = b"PVJ1";

/// Current journal format version.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest accepted payload: 1 MiB. Registry events are small.
pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

/// Frame kind byte for a JSON-encoded registry event.
pub const FRAME_KIND_EVENT: u8 = 0x01;

/// Journal file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
    /// Reserved flags (must be 0).
    pub flags: u16,
}

impl Default for JournalHeader {
    fn default() -> Self {
        Self {
            version: VERSION,
            flags: 0,
        }
    }
}

impl JournalHeader {
    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes
    }

    /// Parses and validates a header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() < HEADER_SIZE {
            return Err(JournalError::InvalidHeader(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic: {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version: 0x{:04x}, expected 0x{:04x}",
                version, VERSION
            )));
        }

        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        if flags != 0 {
            return Err(JournalError::InvalidHeader(format!(
                "non-zero flags: 0x{:04x}",
                flags
            )));
        }
        if bytes[8..HEADER_SIZE].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero reserved bytes".to_string(),
            ));
        }

        Ok(Self { version, flags })
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// JSON-encoded [`RegistryEvent`](provenant_core::RegistryEvent).
    Event,
    /// Kind written by a newer format; skipped by readers.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            FRAME_KIND_EVENT => FrameKind::Event,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::Event => FRAME_KIND_EVENT,
            FrameKind::Unknown(byte) => byte,
        }
    }
}

/// Record frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl FrameHeader {
    /// Creates a frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(Self { kind, len }),
            _ => Err(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            }),
        }
    }

    /// Serializes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.into();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Parses a frame header found at `offset`.
    pub fn from_bytes(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE),
            });
        }
        Ok(Self {
            kind: FrameKind::from(bytes[0]),
            len,
        })
    }
}
