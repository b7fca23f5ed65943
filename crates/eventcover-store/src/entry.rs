//! Ledger entry types.

use eventcover_canonical::{compute_entry_id, Digest, EntryIdError, Principal, Timestamp};
use eventcover_core::{BlockHeight, EventId, EventParams};
use serde::{Deserialize, Serialize};

/// An operation as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Register a new event organized by the caller.
    RegisterEvent {
        /// Identifier chosen by the organizer.
        event_id: EventId,
        /// When the event takes place.
        event_date: BlockHeight,
        /// Price of one unit of insurance.
        premium_amount: u64,
        /// Capacity.
        max_participants: u64,
    },
    /// Buy insurance for an event.
    PurchaseInsurance {
        /// Target event.
        event_id: EventId,
    },
    /// Cancel an event the caller organizes.
    CancelEvent {
        /// Target event.
        event_id: EventId,
    },
    /// Claim a refund for a cancelled event.
    ClaimInsurance {
        /// Target event.
        event_id: EventId,
    },
    /// Credit the caller's wallet from outside the ledger.
    Deposit {
        /// Amount credited.
        amount: u64,
    },
}

impl Operation {
    /// Builds a registration from event parameters.
    pub fn register(params: EventParams) -> Self {
        Operation::RegisterEvent {
            event_id: params.event_id,
            event_date: params.event_date,
            premium_amount: params.premium_amount,
            max_participants: params.max_participants,
        }
    }

    /// Wire name of the operation (the `op` tag).
    pub fn name(&self) -> &'static str {
        match self {
            Operation::RegisterEvent { .. } => "register_event",
            Operation::PurchaseInsurance { .. } => "purchase_insurance",
            Operation::CancelEvent { .. } => "cancel_event",
            Operation::ClaimInsurance { .. } => "claim_insurance",
            Operation::Deposit { .. } => "deposit",
        }
    }

    /// Event the operation targets, if any.
    pub fn event_id(&self) -> Option<EventId> {
        match self {
            Operation::RegisterEvent { event_id, .. }
            | Operation::PurchaseInsurance { event_id }
            | Operation::CancelEvent { event_id }
            | Operation::ClaimInsurance { event_id } => Some(*event_id),
            Operation::Deposit { .. } => None,
        }
    }
}

/// One committed operation as stored in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Content-derived identifier.
    pub entry_id: Digest,
    /// 1-based position in the journal.
    pub seq: u64,
    /// Identifier of the previous entry; absent for the first.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prev_entry_id: Option<Digest>,
    /// Host height the operation ran at.
    pub height: BlockHeight,
    /// Wall-clock time the entry was written.
    pub recorded_at: Timestamp,
    /// Principal that submitted the operation.
    pub caller: Principal,
    /// The operation.
    pub operation: Operation,
}

/// Entry fields that feed the entry ID.
#[derive(Serialize)]
struct EntryBody<'a> {
    seq: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev_entry_id: Option<&'a Digest>,
    height: BlockHeight,
    recorded_at: &'a Timestamp,
    caller: &'a Principal,
    operation: &'a Operation,
}

impl LedgerEntry {
    /// Builds an entry and computes its ID.
    pub fn seal(
        seq: u64,
        prev_entry_id: Option<Digest>,
        height: BlockHeight,
        recorded_at: Timestamp,
        caller: Principal,
        operation: Operation,
    ) -> Result<Self, EntryIdError> {
        let entry_id = compute_entry_id(&EntryBody {
            seq,
            prev_entry_id: prev_entry_id.as_ref(),
            height,
            recorded_at: &recorded_at,
            caller: &caller,
            operation: &operation,
        })?;
        Ok(Self {
            entry_id,
            seq,
            prev_entry_id,
            height,
            recorded_at,
            caller,
            operation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventcover_canonical::verify_entry_id;

    fn sample() -> LedgerEntry {
        LedgerEntry::seal(
            1,
            None,
            BlockHeight(5),
            Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
            Principal::parse("org:acme").unwrap(),
            Operation::CancelEvent {
                event_id: EventId(3),
            },
        )
        .unwrap()
    }

    #[test]
    fn sealed_entry_verifies_from_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(verify_entry_id(&json).unwrap());
    }

    #[test]
    fn operation_wire_shape() {
        let json = serde_json::to_value(&sample().operation).unwrap();
        assert_eq!(json, serde_json::json!({"op": "cancel_event", "event_id": 3}));
    }

    #[test]
    fn first_entry_omits_prev() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("prev_entry_id").is_none());
    }

    #[test]
    fn deposit_has_no_event() {
        assert_eq!(Operation::Deposit { amount: 1 }.event_id(), None);
        assert_eq!(Operation::Deposit { amount: 1 }.name(), "deposit");
    }
}
