//! Hash-chain verification over journaled entries.

use std::path::Path;

use eventcover_canonical::Digest;
use eventcover_core::BlockHeight;
use eventcover_journal::{verify_entry, EntryJson, JournalReader, ReadMode};
use serde::Serialize;
use thiserror::Error;

use crate::entry::LedgerEntry;
use crate::error::StoreError;

/// Why a journal's chain is not intact.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "break", rename_all = "snake_case")]
pub enum ChainBreak {
    /// Entry does not parse as a ledger entry.
    #[error("entry at position {position} is malformed: {reason}")]
    Malformed {
        /// 1-based position in the journal.
        position: u64,
        /// Parser message.
        reason: String,
    },
    /// Entry content does not hash to its `entry_id`.
    #[error("entry {seq} does not match its entry_id")]
    IdMismatch {
        /// Sequence number.
        seq: u64,
    },
    /// Sequence numbers are not contiguous.
    #[error("expected seq {expected}, found {found}")]
    SeqGap {
        /// Expected sequence number.
        expected: u64,
        /// Sequence number found.
        found: u64,
    },
    /// `prev_entry_id` does not point at the previous entry.
    #[error("entry {seq} does not link to its predecessor")]
    Unlinked {
        /// Sequence number.
        seq: u64,
    },
    /// Height went backwards.
    #[error("entry {seq} at height {height} precedes height {previous}")]
    HeightRegression {
        /// Sequence number.
        seq: u64,
        /// Height of this entry.
        height: BlockHeight,
        /// Height of the previous entry.
        previous: BlockHeight,
    },
}

/// Incremental verifier; feed entries in journal order.
#[derive(Debug, Clone, Default)]
pub struct ChainVerifier {
    count: u64,
    tip: Option<Digest>,
    last_height: Option<BlockHeight>,
}

impl ChainVerifier {
    /// Starts at an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the next raw entry and returns it typed.
    pub fn check(&mut self, raw: &EntryJson) -> Result<LedgerEntry, ChainBreak> {
        let position = self.count + 1;
        let entry: LedgerEntry =
            serde_json::from_value(raw.clone()).map_err(|e| ChainBreak::Malformed {
                position,
                reason: e.to_string(),
            })?;

        match verify_entry(raw) {
            Ok(true) => {}
            Ok(false) => return Err(ChainBreak::IdMismatch { seq: entry.seq }),
            Err(e) => {
                return Err(ChainBreak::Malformed {
                    position,
                    reason: e.to_string(),
                })
            }
        }
        if entry.seq != position {
            return Err(ChainBreak::SeqGap {
                expected: position,
                found: entry.seq,
            });
        }
        if entry.prev_entry_id != self.tip {
            return Err(ChainBreak::Unlinked { seq: entry.seq });
        }
        if let Some(previous) = self.last_height {
            if entry.height < previous {
                return Err(ChainBreak::HeightRegression {
                    seq: entry.seq,
                    height: entry.height,
                    previous,
                });
            }
        }

        self.count = position;
        self.tip = Some(entry.entry_id.clone());
        self.last_height = Some(entry.height);
        Ok(entry)
    }

    /// Entries accepted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// ID of the last accepted entry.
    pub fn tip(&self) -> Option<&Digest> {
        self.tip.as_ref()
    }

    /// Height of the last accepted entry.
    pub fn last_height(&self) -> Option<BlockHeight> {
        self.last_height
    }
}

/// Outcome of [`verify_chain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    /// Entries verified before the first break (or in total).
    pub entries: u64,
    /// ID of the last verified entry.
    pub tip: Option<Digest>,
    /// First break found, if any.
    pub broken: Option<ChainBreak>,
}

impl ChainReport {
    /// True when the whole journal verified.
    pub fn is_intact(&self) -> bool {
        self.broken.is_none()
    }
}

/// Verifies every entry ID and link in a journal file.
///
/// Stops at the first break. I/O and framing errors are returned as
/// errors; chain breaks are reported in the [`ChainReport`]. A zero-byte
/// file is an empty journal.
pub fn verify_chain<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<ChainReport, StoreError> {
    let path = path.as_ref();
    let mut verifier = ChainVerifier::new();
    let mut broken = None;
    if std::fs::metadata(path)?.len() == 0 {
        return Ok(ChainReport {
            entries: 0,
            tip: None,
            broken,
        });
    }

    let mut reader = JournalReader::open(path, mode)?;

    while let Some(raw) = reader.read_entry()? {
        if let Err(e) = verifier.check(&raw) {
            broken = Some(e);
            break;
        }
    }

    Ok(ChainReport {
        entries: verifier.count(),
        tip: verifier.tip().cloned(),
        broken,
    })
}
