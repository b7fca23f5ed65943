//! Entry filtering API for selective iteration.

use eventcover_canonical::Principal;
use eventcover_core::{BlockHeight, EventId};

use crate::entry::LedgerEntry;
use crate::error::StoreError;
use crate::reader::EntryReader;

/// Trait for filtering entries during iteration.
pub trait EntryFilter {
    /// Returns true if the entry matches the filter criteria.
    fn matches(&self, entry: &LedgerEntry) -> bool;
}

/// Filter by operation name (e.g. `purchase_insurance`).
#[derive(Debug, Clone)]
pub struct OperationFilter {
    /// Operation name to match.
    pub op: String,
}

impl EntryFilter for OperationFilter {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        entry.operation.name() == self.op
    }
}

/// Filter by caller.
#[derive(Debug, Clone)]
pub struct CallerFilter {
    /// Caller to match.
    pub caller: Principal,
}

impl EntryFilter for CallerFilter {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        entry.caller == self.caller
    }
}

/// Filter by targeted event.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Event to match.
    pub event_id: EventId,
}

impl EntryFilter for EventFilter {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        entry.operation.event_id() == Some(self.event_id)
    }
}

/// Filter by height range.
#[derive(Debug, Clone, Default)]
pub struct HeightRangeFilter {
    /// Include entries at or above this height.
    pub from: Option<BlockHeight>,
    /// Include entries at or below this height.
    pub to: Option<BlockHeight>,
}

impl EntryFilter for HeightRangeFilter {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        self.from.map_or(true, |from| entry.height >= from)
            && self.to.map_or(true, |to| entry.height <= to)
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn EntryFilter>>,
}

impl EntryFilter for AndFilter {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        self.filters.iter().all(|f| f.matches(entry))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn EntryFilter>>,
}

impl EntryFilter for OrFilter {
    fn matches(&self, entry: &LedgerEntry) -> bool {
        self.filters.iter().any(|f| f.matches(entry))
    }
}

/// Reader that yields only entries matching a filter.
pub struct FilteredReader<R: EntryReader, F: EntryFilter> {
    reader: R,
    filter: F,
}

impl<R: EntryReader, F: EntryFilter> FilteredReader<R, F> {
    /// Creates a new filtered reader.
    pub fn new(reader: R, filter: F) -> Self {
        Self { reader, filter }
    }
}

impl<R: EntryReader, F: EntryFilter> EntryReader for FilteredReader<R, F> {
    fn read_next(&mut self) -> Result<Option<LedgerEntry>, StoreError> {
        loop {
            match self.reader.read_next()? {
                None => return Ok(None),
                Some(entry) if self.filter.matches(&entry) => return Ok(Some(entry)),
                Some(_) => continue,
            }
        }
    }
}
