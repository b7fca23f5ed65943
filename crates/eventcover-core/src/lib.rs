//! Core ledger state machine for escrow-backed event insurance.
//!
//! This crate provides:
//! - The Event Registry and Purchase Ledger (`LedgerState`)
//! - The four state transitions: register, purchase, cancel, claim
//! - An explicit unit of work that keeps escrow transfers and ledger
//!   mutations all-or-nothing
//! - The `Escrow` and `Clock` collaborator seams plus reference
//!   implementations
//! - An invariant audit over a ledger
//!
//! Core invariants:
//! - Event identifiers are unique; records are never deleted
//! - `current_participants <= max_participants`
//! - `total_pool` equals the sum of unclaimed `amount_paid`
//! - `Active -> Cancelled` is the only status transition
//! - A purchase is claimed at most once, and only after cancellation
//!
#![deny(missing_docs)]

/// Ledger-wide invariant checks.
pub mod audit;
/// Time source seam.
pub mod clock;
/// Error types for ledger operations.
pub mod errors;
/// Escrow accessor seam and the wallet-backed reference escrow.
pub mod escrow;
/// State manager owning the registry, ledger and escrow.
pub mod ledger;
/// The four ledger operations.
pub mod operations;
/// Event Registry and Purchase Ledger storage.
pub mod state;
/// Identifiers and record types.
pub mod types;
/// All-or-nothing transaction boundary.
pub mod unit_of_work;

pub use audit::{audit, AuditReport, Violation};
pub use clock::{Clock, FixedClock};
pub use errors::{ErrorKind, LedgerError, TransferError};
pub use escrow::{Account, Escrow, WalletEscrow};
pub use ledger::Ledger;
pub use operations::{
    cancel_event, claim_insurance, purchase_insurance, register_event, FundsMovement,
    OperationReceipt,
};
pub use state::LedgerState;
pub use types::{BlockHeight, EventId, EventParams, EventRecord, EventStatus, PurchaseRecord};
pub use unit_of_work::UnitOfWork;

pub use eventcover_canonical::Principal;
