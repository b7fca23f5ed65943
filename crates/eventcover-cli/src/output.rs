//! Output formatting utilities.

use eventcover_store::LedgerEntry;
use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats an entry as a simple table row.
pub fn format_entry_row(entry: &LedgerEntry) -> String {
    let target = entry
        .operation
        .event_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<5} {:<8} {:<20} {:<6} {:<24} {}",
        entry.seq,
        entry.height.0,
        entry.operation.name(),
        target,
        truncate(entry.caller.as_str(), 24),
        truncate(entry.entry_id.b64.as_str(), 44)
    )
}

/// Prints the entry table header.
#[allow(clippy::print_literal)]
pub fn print_entry_header() {
    println!(
        "{:<5} {:<8} {:<20} {:<6} {:<24} {}",
        "SEQ", "HEIGHT", "OPERATION", "EVENT", "CALLER", "ENTRY_ID"
    );
    println!("{}", "-".repeat(110));
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
