//! Views over entry history.

use eventcover_core::EventId;

use crate::entry::LedgerEntry;
use crate::error::StoreError;
use crate::filter::{EventFilter, FilteredReader};
use crate::reader::EntryReader;

/// Collects every entry that targeted `event_id`, in commit order.
///
/// Sequential scan; the journal is not indexed.
pub fn event_history<R: EntryReader>(
    reader: R,
    event_id: EventId,
) -> Result<Vec<LedgerEntry>, StoreError> {
    let mut filtered = FilteredReader::new(reader, EventFilter { event_id });
    let mut history = Vec::new();
    while let Some(entry) = filtered.read_next()? {
        history.push(entry);
    }
    Ok(history)
}

/// Returns the last entry a reader yields.
pub fn latest_entry<R: EntryReader>(mut reader: R) -> Result<Option<LedgerEntry>, StoreError> {
    let mut last = None;
    while let Some(entry) = reader.read_next()? {
        last = Some(entry);
    }
    Ok(last)
}
