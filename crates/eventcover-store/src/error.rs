//! Error types for store operations.

use eventcover_core::{BlockHeight, LedgerError, TransferError};
use thiserror::Error;

use crate::chain::ChainBreak;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] eventcover_journal::JournalError),
    /// Entry (de)serialization failed.
    #[error("entry serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Entry ID could not be computed.
    #[error("entry id error: {0}")]
    EntryId(#[from] eventcover_canonical::EntryIdError),
    /// The ledger rejected the operation; nothing was written.
    #[error("{} (u{}): {}", .0.name(), .0.code(), .0)]
    Rejected(#[from] LedgerError),
    /// A wallet deposit was refused; nothing was written.
    #[error("deposit refused: {0}")]
    Deposit(TransferError),
    /// The supplied height is below the last committed height.
    #[error("height {requested} is below last committed height {last}")]
    ClockRegression {
        /// Last committed height.
        last: BlockHeight,
        /// Height supplied by the caller.
        requested: BlockHeight,
    },
    /// The journal's hash chain is broken.
    #[error("journal chain broken: {0}")]
    Chain(#[from] ChainBreak),
    /// A journaled operation no longer applies during replay.
    #[error("replay of entry {seq} failed: {error}")]
    Replay {
        /// Sequence number of the failing entry.
        seq: u64,
        /// Why it failed.
        error: String,
    },
    /// Another store holds the journal's write lock.
    #[error("journal {} is locked by another writer", .path.display())]
    Locked {
        /// Journal path.
        path: std::path::PathBuf,
        /// Lock failure.
        source: std::io::Error,
    },
    /// The store was opened read-only.
    #[error("store is read-only")]
    ReadOnly,
    /// Wall-clock stamp could not be produced.
    #[error("timestamp error: {0}")]
    Timestamp(#[from] eventcover_canonical::ValidationError),
}

impl StoreError {
    /// The ledger failure tag, when the operation itself was rejected.
    pub fn rejection(&self) -> Option<&LedgerError> {
        match self {
            StoreError::Rejected(e) => Some(e),
            _ => None,
        }
    }
}
