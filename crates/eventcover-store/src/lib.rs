//! Durable, journal-backed storage for the eventcover ledger.
//!
//! This crate provides:
//! - `LedgerEntry`, the hash-chained record of one committed operation
//! - `LedgerStore`, which replays a journal into a live ledger and commits
//!   new operations by appending before making them visible
//! - Entry readers, filters and views for querying history
//! - Chain verification over a journal file
//!
//! Rejected operations are never journaled; a journal only ever contains
//! operations that succeeded, in the order they committed.

#![deny(missing_docs)]

/// Hash-chain verification.
pub mod chain;
/// Ledger entry types.
pub mod entry;
/// Error types for store operations.
pub mod error;
/// Entry filtering.
pub mod filter;
/// Typed entry readers.
pub mod reader;
/// The journal-backed ledger store.
pub mod store;
/// History views.
pub mod view;

pub use chain::{verify_chain, ChainBreak, ChainReport, ChainVerifier};
pub use entry::{LedgerEntry, Operation};
pub use error::StoreError;
pub use eventcover_journal::ReadMode;
pub use filter::{
    AndFilter, CallerFilter, EntryFilter, EventFilter, FilteredReader, HeightRangeFilter,
    OperationFilter, OrFilter,
};
pub use reader::{EntryReader, JournalEntryReader};
pub use store::{Committed, LedgerStore, StoreOptions};
pub use view::{event_history, latest_entry};
