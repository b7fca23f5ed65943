use std::fmt;

use eventcover_canonical::Principal;
use serde::{Deserialize, Serialize};

/// Organizer-chosen event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point on the host's monotonic time axis (block height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Accepting purchases.
    Active,
    /// Cancelled by the organizer; terminal.
    Cancelled,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Active => f.write_str("active"),
            EventStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Inputs to `register_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParams {
    /// Identifier chosen by the organizer.
    pub event_id: EventId,
    /// When the event takes place; must be in the future.
    pub event_date: BlockHeight,
    /// Price of one unit of insurance.
    pub premium_amount: u64,
    /// Capacity.
    pub max_participants: u64,
}

/// Event Registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Principal that registered the event.
    pub organizer: Principal,
    /// When the event takes place.
    pub event_date: BlockHeight,
    /// Price of one unit of insurance.
    pub premium_amount: u64,
    /// Capacity.
    pub max_participants: u64,
    /// Successful purchases so far.
    pub current_participants: u64,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Premiums currently held in escrow for this event.
    pub total_pool: u64,
}

impl EventRecord {
    /// Returns true once capacity is reached.
    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    /// Returns true when `now` is at or past the event date.
    pub fn has_expired(&self, now: BlockHeight) -> bool {
        now >= self.event_date
    }
}

/// Purchase Ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Premium in force at purchase time.
    pub amount_paid: u64,
    /// Set once by a successful claim.
    pub claimed: bool,
}
