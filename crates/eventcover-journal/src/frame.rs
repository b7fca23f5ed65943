use crate::errors::JournalError;

/// Journal file magic bytes.
pub const MAGIC: &[u8; 4] = b"ECJ1";

/// Current journal format version.
pub const VERSION: u16 = 0x0001;

/// Maximum payload size: 16 MiB.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

const KIND_ENTRY_JSON: u8 = 0x01;

/// Journal file header (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl JournalHeader {
    /// Encoded size.
    pub const SIZE: usize = 16;

    /// Header for the current version.
    pub fn current() -> Self {
        Self { version: VERSION }
    }

    /// Encodes the header.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(MAGIC);
        out[4..6].copy_from_slice(&self.version.to_le_bytes());
        // flags (6..8) and reserved (8..16) stay zero
        out
    }

    /// Decodes and validates a header.
    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let bytes: &[u8; Self::SIZE] = bytes
            .get(..Self::SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                JournalError::InvalidHeader(format!("header too short: {} bytes", bytes.len()))
            })?;

        if &bytes[..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "bad magic {:02x?}",
                &bytes[..4]
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version 0x{:04x}",
                version
            )));
        }
        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        if flags != 0 {
            return Err(JournalError::InvalidHeader(format!(
                "non-zero flags 0x{:04x}",
                flags
            )));
        }
        if bytes[8..].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero reserved bytes".to_string(),
            ));
        }
        Ok(Self { version })
    }
}

/// Record frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 JSON ledger entry.
    EntryJson,
    /// Kind this version does not understand; skipped on read.
    Unknown(u8),
}

impl From<u8> for FrameKind {
    fn from(byte: u8) -> Self {
        match byte {
            KIND_ENTRY_JSON => FrameKind::EntryJson,
            other => FrameKind::Unknown(other),
        }
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        match kind {
            FrameKind::EntryJson => KIND_ENTRY_JSON,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Record frame header (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFrame {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Encoded size.
    pub const SIZE: usize = 8;

    /// Builds a frame header for a payload of `len` bytes.
    pub fn new(kind: FrameKind, len: usize) -> Result<Self, JournalError> {
        match u32::try_from(len) {
            Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(Self { kind, len }),
            _ => Err(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            }),
        }
    }

    /// Encodes the frame header.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0] = self.kind.into();
        out[4..].copy_from_slice(&self.len.to_le_bytes());
        out
    }

    /// Decodes a frame header that starts at `offset` in the file.
    pub fn decode(bytes: &[u8; Self::SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0, 0, 0] {
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
