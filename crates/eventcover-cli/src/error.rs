//! CLI-level failures that are not store errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("journal not found: {}", .0.display())]
    JournalMissing(PathBuf),
    #[error("unknown operation '{0}' (expected register_event, purchase_insurance, cancel_event, claim_insurance or deposit)")]
    UnknownOperation(String),
    #[error("audit failed: chain {chain}, {violations} invariant violation(s)")]
    AuditFailed { chain: &'static str, violations: usize },
}
