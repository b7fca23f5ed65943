//! Integration tests for CLI commands.

use std::path::Path;
use std::process::Command;

use eventcover_canonical::{Principal, Timestamp};
use eventcover_core::{BlockHeight, EventId};
use eventcover_journal::{JournalWriter, WriteOptions};
use eventcover_store::{LedgerEntry, LedgerStore, Operation, StoreOptions};
use tempfile::TempDir;

struct Output {
    code: i32,
    stdout: String,
    stderr: String,
}

fn run_cli(journal: &Path, args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_eventcover"))
        .arg("--journal")
        .arg(journal)
        .args(args)
        .env_remove("EVENTCOVER_JOURNAL")
        .env_remove("EVENTCOVER_SYNC")
        .env_remove("EVENTCOVER_LOG")
        .output()
        .expect("Failed to execute CLI");

    Output {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8(output.stdout).unwrap(),
        stderr: String::from_utf8(output.stderr).unwrap(),
    }
}

fn ok(journal: &Path, args: &[&str]) -> String {
    let out = run_cli(journal, args);
    assert_eq!(out.code, 0, "{:?} failed: {}", args, out.stderr);
    out.stdout
}

/// Funds alice and bob, registers event 1 (date 100, premium 500, 2 seats)
/// and has alice buy in.
fn setup() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("ledger.ecj");
    ok(&journal, &["deposit", "--caller", "human:alice", "--height", "1", "--amount", "1000"]);
    ok(&journal, &["deposit", "--caller", "human:bob", "--height", "1", "--amount", "1000"]);
    ok(
        &journal,
        &[
            "register", "--caller", "org:acme", "--height", "2", "--event-id", "1", "--date",
            "100", "--premium", "500", "--capacity", "2",
        ],
    );
    ok(&journal, &["purchase", "--caller", "human:alice", "--height", "3", "--event-id", "1"]);
    (temp_dir, journal)
}

#[test]
fn test_full_lifecycle() {
    let (_temp_dir, journal) = setup();

    let out = ok(&journal, &["cancel", "--caller", "org:acme", "--height", "4", "--event-id", "1"]);
    assert!(out.starts_with("ok: cancel_event #5"));

    let out = ok(&journal, &["claim", "--caller", "human:alice", "--height", "5", "--event-id", "1"]);
    assert!(out.contains("500 paid out to human:alice"));

    let out = ok(&journal, &["balance", "--principal", "human:alice", "--json"]);
    let balance: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(balance["balance"], 1000);

    let out = ok(&journal, &["show", "--event-id", "1", "--json"]);
    let shown: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(shown["event"]["status"], "cancelled");
    assert_eq!(shown["event"]["total_pool"], 0);
    assert_eq!(shown["purchases"][0]["claimed"], true);
}

#[test]
fn test_rejection_exit_code_and_tag() {
    let (_temp_dir, journal) = setup();

    let out = run_cli(&journal, &["cancel", "--caller", "human:bob", "--height", "4", "--event-id", "1"]);
    assert_eq!(out.code, 2);
    assert_eq!(out.stderr.trim(), "Error: UNAUTHORIZED (u1)");

    let out = run_cli(&journal, &["claim", "--caller", "human:alice", "--height", "4", "--event-id", "1"]);
    assert_eq!(out.code, 2);
    assert_eq!(out.stderr.trim(), "Error: NOT_CANCELLED (u8)");

    let out = run_cli(&journal, &["purchase", "--caller", "human:bob", "--height", "4", "--event-id", "9"]);
    assert_eq!(out.code, 2);
    assert_eq!(out.stderr.trim(), "Error: EVENT_NOT_FOUND (u4)");

    let out = run_cli(
        &journal,
        &[
            "register", "--caller", "org:acme", "--height", "4", "--event-id", "2", "--date",
            "4", "--premium", "500", "--capacity", "2",
        ],
    );
    assert_eq!(out.code, 2);
    assert_eq!(out.stderr.trim(), "Error: INVALID_DATE (u9)");

    // Nothing rejected was journaled.
    let out = ok(&journal, &["list", "--json"]);
    assert_eq!(out.lines().count(), 4);
}

#[test]
fn test_invalid_caller_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("ledger.ecj");

    let out = run_cli(&journal, &["deposit", "--caller", "Alice", "--height", "1", "--amount", "5"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("Invalid caller"));
}

#[test]
fn test_clock_regression_exit_code() {
    let (_temp_dir, journal) = setup();

    let out = run_cli(&journal, &["deposit", "--caller", "human:bob", "--height", "2", "--amount", "5"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("below last committed height"));
}

#[test]
fn test_list_filters() {
    let (_temp_dir, journal) = setup();

    let out = ok(&journal, &["list"]);
    assert!(out.contains("SEQ"));
    assert!(out.contains("register_event"));

    let out = ok(&journal, &["list", "--json", "--op", "deposit"]);
    assert_eq!(out.lines().count(), 2);

    let out = ok(&journal, &["list", "--json", "--caller", "human:alice", "--from-height", "2"]);
    let entries: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["operation"]["op"], "purchase_insurance");
    assert_eq!(entries[0]["seq"], 4);

    let out = run_cli(&journal, &["list", "--op", "refund"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("unknown operation"));
}

#[test]
fn test_read_commands_need_journal() {
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("missing.ecj");

    for args in [&["list"][..], &["balance"][..], &["audit"][..]] {
        let out = run_cli(&journal, args);
        assert_eq!(out.code, 1);
        assert!(out.stderr.contains("journal not found"));
    }
    assert!(!journal.exists());
}

#[test]
fn test_audit_clean_and_tampered() {
    let (_temp_dir, journal) = setup();

    let out = ok(&journal, &["audit", "--strict"]);
    assert!(out.contains("chain: intact (4 entries)"));
    assert!(out.contains("audit: 1 events, 1 purchases checked"));

    let bytes = std::fs::read(&journal).unwrap();
    let needle = b"\"premium_amount\":500";
    let at = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap();
    let mut tampered = bytes;
    tampered[at + needle.len() - 3] = b'7';
    std::fs::write(&journal, tampered).unwrap();

    let out = run_cli(&journal, &["audit"]);
    assert_eq!(out.code, 0);
    assert!(out.stdout.contains("chain: broken after 2 entries"));

    let out = run_cli(&journal, &["audit", "--strict", "--json"]);
    assert_eq!(out.code, 1);
    let report: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(report["chain"]["broken"]["break"], "id_mismatch");
    assert_eq!(report["chain"]["broken"]["seq"], 3);
    assert!(report["audit"].is_null());
}

#[test]
fn test_writer_locked_out_while_store_open() {
    let (_temp_dir, journal) = setup();
    let store = LedgerStore::open(&journal, StoreOptions::default()).unwrap();

    let out = run_cli(&journal, &["deposit", "--caller", "human:bob", "--height", "9", "--amount", "5"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("locked by another writer"));

    // Readers are not blocked.
    let out = ok(&journal, &["balance", "--principal", "human:bob", "--json"]);
    let balance: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(balance["balance"], 1000);
    drop(store);

    ok(&journal, &["deposit", "--caller", "human:bob", "--height", "9", "--amount", "5"]);
}

#[test]
fn test_read_commands_do_not_write() {
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("ledger.ecj");
    std::fs::write(&journal, b"").unwrap();

    let out = ok(&journal, &["balance", "--json"]);
    let balance: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(balance["pool"], 0);
    ok(&journal, &["audit", "--strict"]);

    assert_eq!(std::fs::metadata(&journal).unwrap().len(), 0);
    assert!(!temp_dir.path().join("ledger.ecj.lock").exists());
}

#[test]
fn test_audit_reports_unreplayable_entry() {
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("ledger.ecj");

    // Hash chain is fine, but the claim has no purchase behind it.
    let entry = LedgerEntry::seal(
        1,
        None,
        BlockHeight(1),
        Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
        Principal::parse("human:alice").unwrap(),
        Operation::ClaimInsurance {
            event_id: EventId(1),
        },
    )
    .unwrap();
    let mut writer = JournalWriter::open(&journal, WriteOptions::default()).unwrap();
    writer
        .append_entry(&serde_json::to_value(&entry).unwrap())
        .unwrap();
    writer.finish().unwrap();

    let out = ok(&journal, &["audit"]);
    assert!(out.contains("chain: intact (1 entries)"));
    assert!(out.contains("replay: entry 1 no longer applies: EVENT_NOT_FOUND (u4)"));

    let out = run_cli(&journal, &["audit", "--strict", "--json"]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("chain unreplayable"));
    let report: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(report["replay"]["seq"], 1);
    assert!(report["audit"].is_null());
}
