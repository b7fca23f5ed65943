//! Balance command implementation.

use eventcover_canonical::Principal;
use eventcover_core::{Account, Escrow};
use serde_json::json;

use super::Target;
use crate::output;

pub fn run(
    target: &Target,
    principal: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = target.open_existing()?;
    let escrow = store.ledger().escrow();

    if let Some(principal) = principal {
        let principal =
            Principal::parse(principal).map_err(|e| format!("Invalid principal: {}", e))?;
        let balance = escrow.balance(&Account::Principal(principal.clone()));
        if json {
            println!(
                "{}",
                output::format_json(&json!({ "principal": principal, "balance": balance }))
            );
        } else {
            println!("{} {}", principal, balance);
        }
        return Ok(());
    }

    let pool = escrow.balance(&Account::Pool);
    if json {
        let wallets: serde_json::Map<_, _> = escrow
            .wallets()
            .map(|(p, b)| (p.to_string(), json!(b)))
            .collect();
        println!(
            "{}",
            output::format_json(&json!({ "pool": pool, "wallets": wallets }))
        );
    } else {
        println!("{:<32} {}", "ACCOUNT", "BALANCE");
        println!("{:<32} {}", "pool", pool);
        for (principal, balance) in escrow.wallets() {
            println!("{:<32} {}", principal.as_str(), balance);
        }
    }
    Ok(())
}
