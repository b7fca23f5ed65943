use thiserror::Error;

/// Journal read and write failures.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Underlying file I/O failed.
    #[error("journal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Bad magic, version, flags or reserved bytes in the file header.
    #[error("bad journal header: {0}")]
    InvalidHeader(String),
    /// A frame header is malformed.
    #[error("bad frame at byte {offset}: {reason}")]
    InvalidFrame {
        /// Offset of the frame header.
        offset: u64,
        /// What was wrong.
        reason: String,
    },
    /// Entry is larger than a frame can carry.
    #[error("entry of {size} bytes is over the {max} byte frame limit")]
    PayloadTooLarge {
        /// Payload length.
        size: usize,
        /// Frame limit.
        max: u32,
    },
    /// Entry payload is not UTF-8.
    #[error("entry payload is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Entry payload is not JSON.
    #[error("entry payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Entry JSON has the wrong shape for the journal.
    #[error("entry rejected: {0}")]
    InvalidEntry(String),
    /// File has some bytes but fewer than a full header, so it is neither
    /// a new journal nor an existing one.
    #[error("file holds {len} bytes, too short for a journal header")]
    ShortFile {
        /// File length.
        len: u64,
    },
    /// The file changed length behind the writer's back.
    #[error("journal is {found} bytes, writer expected {expected}; another writer appended")]
    LengthChanged {
        /// Length after this writer's last append.
        expected: u64,
        /// Length on disk.
        found: u64,
    },
    /// Partial frame at the end of the file (strict mode).
    #[error("partial frame at byte {offset}")]
    TruncatedFrame {
        /// Offset of the partial frame.
        offset: u64,
    },
}
