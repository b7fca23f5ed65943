use eventcover_canonical::{compute_entry_id, Digest, DigestAlg, Principal};
use serde_json::json;

#[test]
fn digest_serializes_to_golden_json() {
    let digest = Digest {
        alg: DigestAlg::Sha256,
        b64: "Zm9vYmFy".into(),
    };

    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","b64":"Zm9vYmFy"}"#
    );
}

#[test]
fn principal_serializes_transparently() {
    let principal = Principal::parse("org:festival_co").unwrap();
    assert_eq!(
        serde_json::to_string(&principal).unwrap(),
        r#""org:festival_co""#
    );
}

#[test]
fn entry_id_is_independent_of_key_order() {
    let a = json!({"seq": 1, "caller": "human:alice", "operation": {"op": "deposit", "amount": 5}});
    let b = json!({"operation": {"amount": 5, "op": "deposit"}, "caller": "human:alice", "seq": 1});
    assert_eq!(compute_entry_id(&a).unwrap(), compute_entry_id(&b).unwrap());
}

#[test]
fn entry_id_changes_with_content() {
    let a = json!({"seq": 1});
    let b = json!({"seq": 2});
    assert_ne!(compute_entry_id(&a).unwrap(), compute_entry_id(&b).unwrap());
}
