//! Ledger-wide invariant audit.

use std::fmt;

use eventcover_canonical::Principal;
use serde::Serialize;

use crate::escrow::{Account, Escrow};
use crate::ledger::Ledger;
use crate::types::{EventId, EventStatus};

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// More participants than capacity.
    OverCapacity {
        /// Event.
        event_id: EventId,
        /// Recorded participants.
        participants: u64,
        /// Capacity.
        max: u64,
    },
    /// Purchase records disagree with the participant counter.
    ParticipantCountMismatch {
        /// Event.
        event_id: EventId,
        /// Counter value.
        recorded: u64,
        /// Purchase records found.
        purchases: u64,
    },
    /// Pool disagrees with the unclaimed purchases.
    PoolMismatch {
        /// Event.
        event_id: EventId,
        /// `total_pool` value.
        recorded: u64,
        /// Sum of unclaimed `amount_paid`.
        unclaimed: u64,
    },
    /// A claim exists on an event that was never cancelled.
    ClaimWithoutCancellation {
        /// Event.
        event_id: EventId,
        /// Claimant.
        participant: Principal,
    },
    /// Escrow pool balance disagrees with the sum of event pools.
    EscrowMismatch {
        /// Escrow pool balance.
        escrow_pool: u64,
        /// Sum of `total_pool` across events.
        ledger_pool: u128,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OverCapacity {
                event_id,
                participants,
                max,
            } => write!(f, "event {event_id}: {participants} participants exceeds capacity {max}"),
            Violation::ParticipantCountMismatch {
                event_id,
                recorded,
                purchases,
            } => write!(f, "event {event_id}: counter {recorded} but {purchases} purchases"),
            Violation::PoolMismatch {
                event_id,
                recorded,
                unclaimed,
            } => write!(f, "event {event_id}: pool {recorded} but unclaimed premiums {unclaimed}"),
            Violation::ClaimWithoutCancellation {
                event_id,
                participant,
            } => write!(f, "event {event_id}: {participant} claimed while active"),
            Violation::EscrowMismatch {
                escrow_pool,
                ledger_pool,
            } => write!(f, "escrow pool {escrow_pool} but ledger pools sum to {ledger_pool}"),
        }
    }
}

/// Result of [`audit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Events inspected.
    pub events_checked: usize,
    /// Purchases inspected.
    pub purchases_checked: usize,
    /// Findings; empty when the ledger is consistent.
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// True when no invariant is broken.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks the ledger's accounting invariants against its escrow.
pub fn audit<E: Escrow>(ledger: &Ledger<E>) -> AuditReport {
    let mut report = AuditReport::default();
    let mut ledger_pool: u128 = 0;

    for (event_id, event) in ledger.state().events() {
        report.events_checked += 1;
        ledger_pool += u128::from(event.total_pool);

        if event.current_participants > event.max_participants {
            report.violations.push(Violation::OverCapacity {
                event_id,
                participants: event.current_participants,
                max: event.max_participants,
            });
        }

        let mut purchases = 0u64;
        let mut unclaimed = 0u64;
        for (participant, purchase) in ledger.state().purchases_for(event_id) {
            report.purchases_checked += 1;
            purchases += 1;
            if purchase.claimed {
                if event.status != EventStatus::Cancelled {
                    report.violations.push(Violation::ClaimWithoutCancellation {
                        event_id,
                        participant: participant.clone(),
                    });
                }
            } else {
                unclaimed = unclaimed.saturating_add(purchase.amount_paid);
            }
        }

        if purchases != event.current_participants {
            report.violations.push(Violation::ParticipantCountMismatch {
                event_id,
                recorded: event.current_participants,
                purchases,
            });
        }
        if unclaimed != event.total_pool {
            report.violations.push(Violation::PoolMismatch {
                event_id,
                recorded: event.total_pool,
                unclaimed,
            });
        }
    }

    let escrow_pool = ledger.escrow().balance(&Account::Pool);
    if u128::from(escrow_pool) != ledger_pool {
        report.violations.push(Violation::EscrowMismatch {
            escrow_pool,
            ledger_pool,
        });
    }

    report
}
