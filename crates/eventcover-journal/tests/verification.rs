use eventcover_canonical::compute_entry_id;
use eventcover_journal::{verify_entry, JournalError};
use serde_json::json;

#[test]
fn accepts_entry_with_matching_id() {
    let mut entry = json!({"seq": 1, "caller": "human:alice"});
    entry["entry_id"] = serde_json::to_value(compute_entry_id(&entry).unwrap()).unwrap();
    assert!(verify_entry(&entry).unwrap());
}

#[test]
fn rejects_edited_entry() {
    let mut entry = json!({"seq": 1, "caller": "human:alice"});
    entry["entry_id"] = serde_json::to_value(compute_entry_id(&entry).unwrap()).unwrap();
    entry["seq"] = json!(2);
    assert!(!verify_entry(&entry).unwrap());
}

#[test]
fn missing_id_is_an_error() {
    assert!(matches!(
        verify_entry(&json!({"seq": 1})),
        Err(JournalError::InvalidEntry(_))
    ));
}
