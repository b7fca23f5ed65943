//! Mutating commands: deposit, register, purchase, cancel, claim.

use eventcover_canonical::Principal;
use eventcover_core::{BlockHeight, EventId, FundsMovement};
use eventcover_store::{Committed, Operation};
use serde_json::json;

use super::Target;
use crate::output;

/// Caller identity and height for one submission.
pub struct Tx {
    pub caller: String,
    pub height: u64,
    pub json: bool,
}

pub fn deposit(target: &Target, tx: Tx, amount: u64) -> Result<(), Box<dyn std::error::Error>> {
    execute(target, tx, Operation::Deposit { amount })
}

pub fn register(
    target: &Target,
    tx: Tx,
    event_id: u64,
    date: u64,
    premium: u64,
    capacity: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    execute(
        target,
        tx,
        Operation::RegisterEvent {
            event_id: EventId(event_id),
            event_date: BlockHeight(date),
            premium_amount: premium,
            max_participants: capacity,
        },
    )
}

pub fn purchase(target: &Target, tx: Tx, event_id: u64) -> Result<(), Box<dyn std::error::Error>> {
    execute(
        target,
        tx,
        Operation::PurchaseInsurance {
            event_id: EventId(event_id),
        },
    )
}

pub fn cancel(target: &Target, tx: Tx, event_id: u64) -> Result<(), Box<dyn std::error::Error>> {
    execute(
        target,
        tx,
        Operation::CancelEvent {
            event_id: EventId(event_id),
        },
    )
}

pub fn claim(target: &Target, tx: Tx, event_id: u64) -> Result<(), Box<dyn std::error::Error>> {
    execute(
        target,
        tx,
        Operation::ClaimInsurance {
            event_id: EventId(event_id),
        },
    )
}

fn execute(target: &Target, tx: Tx, operation: Operation) -> Result<(), Box<dyn std::error::Error>> {
    let caller = Principal::parse(tx.caller).map_err(|e| format!("Invalid caller: {}", e))?;
    let mut store = target.open()?;
    let committed = store.execute(&caller, BlockHeight(tx.height), operation)?;

    if tx.json {
        let receipt = committed
            .receipt
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        println!(
            "{}",
            output::format_json(&json!({ "entry": committed.entry, "receipt": receipt }))
        );
    } else {
        println!("{}", summary(&committed));
    }
    Ok(())
}

fn summary(committed: &Committed) -> String {
    let entry = &committed.entry;
    let moved = match committed.receipt.as_ref().map(|r| &r.movement) {
        Some(FundsMovement::Escrowed { from, amount }) => format!(", {} escrowed from {}", amount, from),
        Some(FundsMovement::PaidOut { to, amount }) => format!(", {} paid out to {}", amount, to),
        _ => String::new(),
    };
    format!(
        "ok: {} #{} {}{}",
        entry.operation.name(),
        entry.seq,
        entry.entry_id,
        moved
    )
}
