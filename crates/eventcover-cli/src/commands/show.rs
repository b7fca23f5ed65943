//! Show command implementation.

use eventcover_core::EventId;
use serde_json::json;

use super::Target;
use crate::output;

pub fn run(target: &Target, event_id: u64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = target.open_existing()?;
    let ledger = store.ledger();
    let id = EventId(event_id);
    let event = ledger
        .event(id)
        .ok_or_else(|| format!("event {} not found", id))?;

    if json {
        let purchases: Vec<_> = ledger
            .purchases_for(id)
            .map(|(participant, purchase)| {
                json!({
                    "participant": participant,
                    "amount_paid": purchase.amount_paid,
                    "claimed": purchase.claimed,
                })
            })
            .collect();
        println!(
            "{}",
            output::format_json(&json!({
                "event_id": id,
                "event": event,
                "purchases": purchases,
            }))
        );
        return Ok(());
    }

    println!("event {}", id);
    println!("  organizer     {}", event.organizer);
    println!("  status        {}", event.status);
    println!("  date          {}", event.event_date);
    println!("  premium       {}", event.premium_amount);
    println!(
        "  participants  {}/{}",
        event.current_participants, event.max_participants
    );
    println!("  pool          {}", event.total_pool);

    let mut purchases = ledger.purchases_for(id).peekable();
    if purchases.peek().is_some() {
        println!();
        println!("{:<32} {:<12} {}", "PARTICIPANT", "PAID", "CLAIMED");
        for (participant, purchase) in purchases {
            println!(
                "{:<32} {:<12} {}",
                participant.as_str(),
                purchase.amount_paid,
                purchase.claimed
            );
        }
    }
    Ok(())
}
