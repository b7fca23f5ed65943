//! Entry identifiers for journaled ledger operations.
//!
//! An entry ID is `sha256(domain_separator || canonical_bytes(entry))` with
//! the `entry_id` member removed from the hash input.

use crate::{canonical_bytes, CanonicalizationError, Digest, DigestAlg, ValidationError};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};

/// Domain separator for entry ID computation: `b"eventcover:entry:v1\0"`.
const ENTRY_DOMAIN_SEPARATOR: &[u8] = b"eventcover:entry:v1\0";

/// Error during entry ID computation.
#[derive(thiserror::Error, Debug)]
pub enum EntryIdError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// Digest construction failed.
    #[error("digest construction failed: {0}")]
    Digest(#[from] ValidationError),
    /// The value carries no parseable `entry_id`.
    #[error("missing or invalid entry_id")]
    MissingEntryId,
}

/// Computes the entry ID for any serializable entry.
///
/// # Example
///
/// ```rust
/// use eventcover_canonical::compute_entry_id;
/// use serde_json::json;
///
/// let entry = json!({"seq": 1, "caller": "human:alice"});
/// let id = compute_entry_id(&entry)?;
/// assert_eq!(id.b64.len(), 43);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_entry_id<T: Serialize>(entry: &T) -> Result<Digest, EntryIdError> {
    let mut value: Value =
        serde_json::to_value(entry).map_err(|e| EntryIdError::Serialization(e.to_string()))?;

    if let Value::Object(map) = &mut value {
        map.remove("entry_id");
    }

    // Floats must be refused before stringification hides them.
    canonical_bytes(&value)?;
    stringify_numbers(&mut value);
    let bytes = canonical_bytes(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(ENTRY_DOMAIN_SEPARATOR);
    hasher.update(&bytes);
    let hash_bytes = hasher.finalize();

    use base64::Engine;
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash_bytes);
    Ok(Digest::new(DigestAlg::Sha256, b64)?)
}

/// Checks that the `entry_id` member of `entry` matches its content.
pub fn verify_entry_id(entry: &Value) -> Result<bool, EntryIdError> {
    let claimed: Digest = entry
        .get("entry_id")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .ok_or(EntryIdError::MissingEntryId)?;
    Ok(compute_entry_id(entry)? == claimed)
}

/// Recursively converts all JSON numbers into strings.
fn stringify_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            let s = n.to_string();
            *value = Value::String(s);
        }
        Value::Array(arr) => {
            for v in arr {
                stringify_numbers(v);
            }
        }
        Value::Object(map) => {
            for v in map.values_mut() {
                stringify_numbers(v);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_id_ignores_existing_entry_id() {
        let bare = json!({"seq": 1, "height": 10});
        let mut with_id = bare.clone();
        with_id["entry_id"] = json!({"alg": "sha-256", "b64": "x"});
        assert_eq!(
            compute_entry_id(&bare).unwrap(),
            compute_entry_id(&with_id).unwrap()
        );
    }

    #[test]
    fn number_and_string_hash_identically() {
        let a = compute_entry_id(&json!({"amount": 50000000u64})).unwrap();
        let b = compute_entry_id(&json!({"amount": "50000000"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn verify_detects_tampering() {
        let mut entry = json!({"seq": 3, "caller": "human:bob"});
        entry["entry_id"] = serde_json::to_value(compute_entry_id(&entry).unwrap()).unwrap();
        assert!(verify_entry_id(&entry).unwrap());

        entry["caller"] = json!("human:mallory");
        assert!(!verify_entry_id(&entry).unwrap());
    }

    #[test]
    fn verify_requires_entry_id() {
        assert!(matches!(
            verify_entry_id(&json!({"seq": 1})),
            Err(EntryIdError::MissingEntryId)
        ));
    }
}
