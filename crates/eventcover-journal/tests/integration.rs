use eventcover_journal::{EntryJson, JournalReader, JournalWriter, ReadMode, WriteOptions};
use serde_json::json;
use tempfile::TempDir;

fn make_entry(seq: u64) -> EntryJson {
    json!({
        "seq": seq,
        "height": 10 + seq,
        "recorded_at": "2024-01-01T00:00:00Z",
        "caller": "human:alice",
        "operation": { "op": "purchase_insurance", "event_id": 1 }
    })
}

#[test]
fn test_write_read_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.ecj");

    {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        assert!(writer.is_empty());
        writer.append_entry(&make_entry(1)).unwrap();
        writer.append_entry(&make_entry(2)).unwrap();
        assert!(!writer.is_empty());
        writer.finish().unwrap();
    }

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_entry().unwrap().unwrap()["seq"], 1);
    assert_eq!(reader.read_entry().unwrap().unwrap()["seq"], 2);
    assert!(reader.read_entry().unwrap().is_none());
}

#[test]
fn test_reopen_appends() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.ecj");

    for seq in 1..=3 {
        let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
        writer.append_entry(&make_entry(seq)).unwrap();
        writer.finish().unwrap();
    }

    let reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    let seqs: Vec<u64> = reader
        .map(|e| e.unwrap()["seq"].as_u64().unwrap())
        .collect();
    assert_eq!(seqs, vec![1, 2, 3]);
}

#[test]
fn test_sync_option() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.ecj");

    let options = WriteOptions {
        sync: true,
        ..WriteOptions::default()
    };
    let mut writer = JournalWriter::open(&path, options).unwrap();
    writer.append_entry(&make_entry(1)).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_entry().unwrap().unwrap()["seq"], 1);
}

#[test]
fn test_create_false_requires_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.ecj");
    let options = WriteOptions {
        create: false,
        ..WriteOptions::default()
    };
    assert!(JournalWriter::open(&path, options).is_err());
}

#[test]
fn test_rejects_non_object_entry() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.ecj");
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    assert!(writer.append_entry(&json!([1, 2, 3])).is_err());
    assert!(writer.is_empty());
}

#[test]
fn test_position_advances_per_frame() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.ecj");
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_entry(&make_entry(1)).unwrap();
    let len_after_one = writer.len();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.position(), 16);
    reader.read_entry().unwrap();
    assert_eq!(reader.position(), len_after_one);
}
