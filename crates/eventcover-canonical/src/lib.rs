//! Canonical primitives shared by every eventcover crate.
//!
//! Anything that participates in hashing a journal entry, or that names a
//! principal on the ledger, lives here so that the core state machine and
//! the durable store agree byte-for-byte.
//!
#![deny(missing_docs)]

/// Canonical JSON encoding used as hash input.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Domain-separated entry identifiers.
pub mod entry_id;
/// Principal and timestamp newtypes.
pub mod identifiers;
/// Validation errors for canonical types.
pub mod validation;

pub use canonicalizer::{canonical_bytes, CanonicalizationError};
pub use digest::{Digest, DigestAlg};
pub use entry_id::{compute_entry_id, verify_entry_id, EntryIdError};
pub use identifiers::{Principal, Timestamp};
pub use validation::ValidationError;
