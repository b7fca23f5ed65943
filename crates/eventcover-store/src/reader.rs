//! Typed entry readers.

use std::path::Path;

use eventcover_journal::{JournalReader, ReadMode};

use crate::entry::LedgerEntry;
use crate::error::StoreError;

/// Source of ledger entries in journal order.
pub trait EntryReader {
    /// Returns the next entry, or `None` at the end.
    fn read_next(&mut self) -> Result<Option<LedgerEntry>, StoreError>;
}

/// Reads typed entries from a journal file without verifying the chain.
pub struct JournalEntryReader {
    inner: JournalReader,
}

impl JournalEntryReader {
    /// Opens a journal for typed reading.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        Ok(Self {
            inner: JournalReader::open(path, mode)?,
        })
    }
}

impl EntryReader for JournalEntryReader {
    fn read_next(&mut self) -> Result<Option<LedgerEntry>, StoreError> {
        match self.inner.read_entry()? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_value(raw)?)),
        }
    }
}

impl<R: EntryReader + ?Sized> EntryReader for &mut R {
    fn read_next(&mut self) -> Result<Option<LedgerEntry>, StoreError> {
        (**self).read_next()
    }
}

/// In-memory entries, mostly for tests and views over already-loaded history.
impl EntryReader for std::vec::IntoIter<LedgerEntry> {
    fn read_next(&mut self) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self.next())
    }
}
