//! Audit command implementation.

use eventcover_core::{audit, AuditReport};
use eventcover_store::{verify_chain, LedgerStore, ReadMode, StoreError};
use serde_json::json;

use super::Target;
use crate::error::CliError;
use crate::output;

pub fn run(target: &Target, strict: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    target.require_existing()?;
    let chain = verify_chain(&target.journal, ReadMode::Strict)?;

    // Replay only an intact chain; a broken one would fail to open.
    let mut replay_failure = None;
    let mut report: Option<AuditReport> = None;
    if chain.is_intact() {
        match LedgerStore::open_read_only(&target.journal, ReadMode::Strict) {
            Ok(store) => report = Some(audit(store.ledger())),
            Err(StoreError::Replay { seq, error }) => replay_failure = Some((seq, error)),
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        let replay = replay_failure
            .as_ref()
            .map(|(seq, error)| json!({ "seq": seq, "error": error }));
        println!(
            "{}",
            output::format_json(&json!({ "chain": chain, "replay": replay, "audit": report }))
        );
    } else {
        match &chain.broken {
            None => println!("chain: intact ({} entries)", chain.entries),
            Some(e) => println!("chain: broken after {} entries: {}", chain.entries, e),
        }
        if let Some((seq, error)) = &replay_failure {
            println!("replay: entry {} no longer applies: {}", seq, error);
        }
        if let Some(report) = &report {
            println!(
                "audit: {} events, {} purchases checked",
                report.events_checked, report.purchases_checked
            );
            for violation in &report.violations {
                println!("  {}", violation);
            }
        }
    }

    let violations = report.as_ref().map_or(0, |r| r.violations.len());
    let chain_state = if !chain.is_intact() {
        "broken"
    } else if replay_failure.is_some() {
        "unreplayable"
    } else {
        "intact"
    };
    if strict && (chain_state != "intact" || violations > 0) {
        return Err(CliError::AuditFailed {
            chain: chain_state,
            violations,
        }
        .into());
    }
    Ok(())
}
