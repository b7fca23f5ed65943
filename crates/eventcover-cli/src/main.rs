//! Eventcover CLI - command-line interface over a journal-backed insurance ledger.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eventcover_store::StoreError;

mod commands;
mod error;
mod output;
mod telemetry;

use commands::{audit, balance, list, show, submit, Target};

#[derive(Parser)]
#[command(name = "eventcover")]
#[command(about = "Escrow-backed event insurance ledger")]
struct Cli {
    /// Path to the ledger journal
    #[arg(long, global = true, env = "EVENTCOVER_JOURNAL", default_value = "eventcover.ecj")]
    journal: PathBuf,
    /// fsync after every committed entry
    #[arg(long, global = true, env = "EVENTCOVER_SYNC")]
    sync: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Caller identity and host height for mutating commands.
#[derive(clap::Args)]
struct TxArgs {
    /// Principal submitting the operation (e.g. human:alice)
    #[arg(long)]
    caller: String,
    /// Current block height
    #[arg(long)]
    height: u64,
    /// Output the committed entry as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Credit the caller's wallet
    Deposit {
        #[command(flatten)]
        tx: TxArgs,
        /// Amount to credit
        #[arg(long)]
        amount: u64,
    },
    /// Register a new event organized by the caller
    Register {
        #[command(flatten)]
        tx: TxArgs,
        /// Event identifier
        #[arg(long)]
        event_id: u64,
        /// Event date (block height)
        #[arg(long)]
        date: u64,
        /// Premium per participant
        #[arg(long)]
        premium: u64,
        /// Maximum participants
        #[arg(long)]
        capacity: u64,
    },
    /// Buy insurance for an event
    Purchase {
        #[command(flatten)]
        tx: TxArgs,
        /// Event identifier
        #[arg(long)]
        event_id: u64,
    },
    /// Cancel an event (organizer only)
    Cancel {
        #[command(flatten)]
        tx: TxArgs,
        /// Event identifier
        #[arg(long)]
        event_id: u64,
    },
    /// Claim a refund for a cancelled event
    Claim {
        #[command(flatten)]
        tx: TxArgs,
        /// Event identifier
        #[arg(long)]
        event_id: u64,
    },
    /// Show an event and its purchases
    Show {
        /// Event identifier
        #[arg(long)]
        event_id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show wallet and pool balances
    Balance {
        /// Only this principal's wallet
        #[arg(long)]
        principal: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List journal entries
    List {
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
        /// Only this operation (e.g. purchase_insurance)
        #[arg(long)]
        op: Option<String>,
        /// Only entries submitted by this principal
        #[arg(long)]
        caller: Option<String>,
        /// Only entries targeting this event
        #[arg(long)]
        event_id: Option<u64>,
        /// Only entries at or above this height
        #[arg(long)]
        from_height: Option<u64>,
        /// Only entries at or below this height
        #[arg(long)]
        to_height: Option<u64>,
    },
    /// Verify the hash chain and audit ledger invariants
    Audit {
        /// Exit with an error if anything is found
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    telemetry::init();
    let cli = Cli::parse();
    let target = Target {
        journal: cli.journal,
        sync: cli.sync,
    };

    let result = match cli.command {
        Commands::Deposit { tx, amount } => submit::deposit(&target, tx.into(), amount),
        Commands::Register {
            tx,
            event_id,
            date,
            premium,
            capacity,
        } => submit::register(&target, tx.into(), event_id, date, premium, capacity),
        Commands::Purchase { tx, event_id } => submit::purchase(&target, tx.into(), event_id),
        Commands::Cancel { tx, event_id } => submit::cancel(&target, tx.into(), event_id),
        Commands::Claim { tx, event_id } => submit::claim(&target, tx.into(), event_id),
        Commands::Show { event_id, json } => show::run(&target, event_id, json),
        Commands::Balance { principal, json } => balance::run(&target, principal, json),
        Commands::List {
            json,
            op,
            caller,
            event_id,
            from_height,
            to_height,
        } => list::run(
            &target,
            json,
            list::Filters {
                op,
                caller,
                event_id,
                from_height,
                to_height,
            },
        ),
        Commands::Audit { strict, json } => audit::run(&target, strict, json),
    };

    if let Err(e) = result {
        std::process::exit(report(e.as_ref()));
    }
}

/// Prints the error and returns the exit code: 2 for a rejected operation,
/// 1 for everything else.
fn report(e: &(dyn std::error::Error + 'static)) -> i32 {
    if let Some(rejection) = e
        .downcast_ref::<StoreError>()
        .and_then(StoreError::rejection)
    {
        eprintln!("Error: {} (u{})", rejection.name(), rejection.code());
        return 2;
    }
    eprintln!("Error: {}", e);
    1
}

impl From<TxArgs> for submit::Tx {
    fn from(args: TxArgs) -> Self {
        submit::Tx {
            caller: args.caller,
            height: args.height,
            json: args.json,
        }
    }
}
