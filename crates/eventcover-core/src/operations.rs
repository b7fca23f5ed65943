//! The four ledger operations.
//!
//! Each takes an open [`UnitOfWork`] and either returns a receipt, leaving
//! its writes staged for the caller to commit, or returns the failure tag.
//! All checks run before the escrow is touched, so a rejected operation
//! stages nothing.

use eventcover_canonical::Principal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::LedgerError;
use crate::escrow::{Account, Escrow};
use crate::types::{EventId, EventParams, EventRecord, EventStatus, PurchaseRecord};
use crate::unit_of_work::UnitOfWork;

/// Funds moved by a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FundsMovement {
    /// Nothing moved.
    None,
    /// Premium moved from a participant into the pool.
    Escrowed {
        /// Paying participant.
        from: Principal,
        /// Premium amount.
        amount: u64,
    },
    /// Refund moved from the pool to a participant.
    PaidOut {
        /// Receiving participant.
        to: Principal,
        /// Refunded amount.
        amount: u64,
    },
}

/// Success signal of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReceipt {
    /// Event the operation acted on.
    pub event_id: EventId,
    /// Funds moved, if any.
    pub movement: FundsMovement,
}

/// Registers a new event organized by `caller`.
///
/// Fails with `EVENT_EXISTS`, `INVALID_DATE` (date not strictly after
/// now), `INVALID_AMOUNT` (zero premium) or `INVALID_CAPACITY` (zero
/// capacity, or a full pool that would not fit in `u64`).
pub fn register_event<E: Escrow>(
    uow: &mut UnitOfWork<'_, E>,
    caller: &Principal,
    params: EventParams,
) -> Result<OperationReceipt, LedgerError> {
    let EventParams {
        event_id,
        event_date,
        premium_amount,
        max_participants,
    } = params;

    if uow.state().event(event_id).is_some() {
        return Err(LedgerError::EventExists);
    }
    if event_date <= uow.now() {
        return Err(LedgerError::InvalidDate);
    }
    if premium_amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if max_participants == 0 || premium_amount.checked_mul(max_participants).is_none() {
        return Err(LedgerError::InvalidCapacity);
    }

    uow.insert_event(
        event_id,
        EventRecord {
            organizer: caller.clone(),
            event_date,
            premium_amount,
            max_participants,
            current_participants: 0,
            status: EventStatus::Active,
            total_pool: 0,
        },
    );
    debug!(%event_id, organizer = %caller, %event_date, premium_amount, max_participants, "event registered");

    Ok(OperationReceipt {
        event_id,
        movement: FundsMovement::None,
    })
}

/// Cancels an active event. Only its organizer may do so.
///
/// Cancellation is allowed after the event date; funds stay in escrow
/// until each participant claims.
pub fn cancel_event<E: Escrow>(
    uow: &mut UnitOfWork<'_, E>,
    caller: &Principal,
    event_id: EventId,
) -> Result<OperationReceipt, LedgerError> {
    let event = uow
        .state()
        .event(event_id)
        .ok_or(LedgerError::EventNotFound)?;
    if event.organizer != *caller {
        return Err(LedgerError::Unauthorized);
    }
    if event.status != EventStatus::Active {
        return Err(LedgerError::AlreadyCancelled);
    }

    uow.update_event(event_id, |e| e.status = EventStatus::Cancelled)?;
    debug!(%event_id, organizer = %caller, "event cancelled");

    Ok(OperationReceipt {
        event_id,
        movement: FundsMovement::None,
    })
}

/// Escrows one premium from `caller` for an active, unexpired, non-full
/// event the caller has not bought into yet.
pub fn purchase_insurance<E: Escrow>(
    uow: &mut UnitOfWork<'_, E>,
    caller: &Principal,
    event_id: EventId,
) -> Result<OperationReceipt, LedgerError> {
    let event = uow
        .state()
        .event(event_id)
        .ok_or(LedgerError::EventNotFound)?;
    if event.status != EventStatus::Active {
        return Err(LedgerError::EventCancelled);
    }
    if event.has_expired(uow.now()) {
        return Err(LedgerError::EventExpired);
    }
    if event.is_full() {
        return Err(LedgerError::EventFull);
    }
    if uow.state().purchase(event_id, caller).is_some() {
        return Err(LedgerError::AlreadyPurchased);
    }
    let premium = event.premium_amount;

    uow.transfer(&Account::Principal(caller.clone()), &Account::Pool, premium)
        .map_err(LedgerError::PaymentFailed)?;
    uow.insert_purchase(
        event_id,
        caller.clone(),
        PurchaseRecord {
            amount_paid: premium,
            claimed: false,
        },
    );
    // premium * max_participants fits in u64 (checked at registration).
    uow.update_event(event_id, |e| {
        e.current_participants += 1;
        e.total_pool += premium;
    })?;
    debug!(%event_id, participant = %caller, premium, "insurance purchased");

    Ok(OperationReceipt {
        event_id,
        movement: FundsMovement::Escrowed {
            from: caller.clone(),
            amount: premium,
        },
    })
}

/// Refunds `caller`'s premium from escrow after the event is cancelled.
pub fn claim_insurance<E: Escrow>(
    uow: &mut UnitOfWork<'_, E>,
    caller: &Principal,
    event_id: EventId,
) -> Result<OperationReceipt, LedgerError> {
    let event = uow
        .state()
        .event(event_id)
        .ok_or(LedgerError::EventNotFound)?;
    if event.status != EventStatus::Cancelled {
        return Err(LedgerError::NotCancelled);
    }
    let purchase = uow
        .state()
        .purchase(event_id, caller)
        .ok_or(LedgerError::NoPurchaseFound)?;
    if purchase.claimed {
        return Err(LedgerError::AlreadyClaimed);
    }
    let amount = purchase.amount_paid;

    uow.transfer(&Account::Pool, &Account::Principal(caller.clone()), amount)
        .map_err(LedgerError::PayoutFailed)?;
    uow.update_purchase(event_id, caller, |p| p.claimed = true)?;
    uow.update_event(event_id, |e| e.total_pool -= amount)?;
    debug!(%event_id, participant = %caller, amount, "insurance claimed");

    Ok(OperationReceipt {
        event_id,
        movement: FundsMovement::PaidOut {
            to: caller.clone(),
            amount,
        },
    })
}
