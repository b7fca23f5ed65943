//! Entry identity checks for journaled entries.

use crate::errors::JournalError;
use crate::EntryJson;
use eventcover_canonical::verify_entry_id;

/// Verifies an entry against its claimed `entry_id`.
///
/// Returns `Ok(false)` on a mismatch and an error when the entry carries no
/// usable `entry_id` at all.
pub fn verify_entry(entry: &EntryJson) -> Result<bool, JournalError> {
    verify_entry_id(entry).map_err(|e| JournalError::InvalidEntry(e.to_string()))
}
