use thiserror::Error;

use crate::escrow::Account;

/// Classification of ledger failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced identifier has no record.
    NotFound,
    /// Caller lacks the required role.
    Authorization,
    /// Malformed input or wrong state for the action.
    Validation,
    /// The escrow declined to move funds.
    Transfer,
}

/// Failure reported by an escrow accessor. No funds moved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Source account cannot cover the amount.
    #[error("insufficient funds in {account}: available {available}, required {required}")]
    InsufficientFunds {
        /// Account that was debited.
        account: Account,
        /// Balance at the time of the attempt.
        available: u64,
        /// Amount requested.
        required: u64,
    },
    /// Transfers must move a positive amount.
    #[error("transfer amount must be positive")]
    ZeroAmount,
    /// Crediting would overflow the destination balance.
    #[error("balance overflow crediting {0}")]
    Overflow(Account),
    /// The accessor refused for its own reasons.
    #[error("transfer declined: {0}")]
    Declined(String),
}

/// Tagged failure of a ledger operation.
///
/// `code()` is the numeric wire code; existing callers match on 1, 2, 4
/// and 9, so those values are fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the event organizer.
    #[error("caller is not the event organizer")]
    Unauthorized,
    /// Premium must be positive.
    #[error("premium amount must be positive")]
    InvalidAmount,
    /// Event identifier already registered.
    #[error("event already exists")]
    EventExists,
    /// No event with that identifier.
    #[error("event not found")]
    EventNotFound,
    /// Participant already holds a purchase for this event.
    #[error("insurance already purchased for this event")]
    AlreadyPurchased,
    /// Capacity reached.
    #[error("event is full")]
    EventFull,
    /// Purchase already paid out.
    #[error("insurance already claimed")]
    AlreadyClaimed,
    /// Claims require a cancelled event.
    #[error("event has not been cancelled")]
    NotCancelled,
    /// Event date is not strictly in the future.
    #[error("event date must be after the current height")]
    InvalidDate,
    /// Capacity is zero, or capacity times premium does not fit in u64.
    #[error("invalid event capacity")]
    InvalidCapacity,
    /// Purchases require an active event.
    #[error("event has been cancelled")]
    EventCancelled,
    /// Event date reached; no more purchases.
    #[error("event has expired")]
    EventExpired,
    /// Cancellation is not repeatable.
    #[error("event already cancelled")]
    AlreadyCancelled,
    /// Caller holds no purchase for this event.
    #[error("no purchase found for caller")]
    NoPurchaseFound,
    /// Premium could not be escrowed.
    #[error("payment failed: {0}")]
    PaymentFailed(TransferError),
    /// Refund could not be paid out of escrow.
    #[error("payout failed: {0}")]
    PayoutFailed(TransferError),
}

impl LedgerError {
    /// Numeric wire code.
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::Unauthorized => 1,
            LedgerError::InvalidAmount => 2,
            LedgerError::EventExists => 3,
            LedgerError::EventNotFound => 4,
            LedgerError::AlreadyPurchased => 5,
            LedgerError::EventFull => 6,
            LedgerError::AlreadyClaimed => 7,
            LedgerError::NotCancelled => 8,
            LedgerError::InvalidDate => 9,
            LedgerError::InvalidCapacity => 10,
            LedgerError::EventCancelled => 11,
            LedgerError::EventExpired => 12,
            LedgerError::AlreadyCancelled => 13,
            LedgerError::NoPurchaseFound => 14,
            LedgerError::PaymentFailed(_) => 15,
            LedgerError::PayoutFailed(_) => 16,
        }
    }

    /// Stable failure tag, e.g. `EVENT_NOT_FOUND`.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerError::Unauthorized => "UNAUTHORIZED",
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::EventExists => "EVENT_EXISTS",
            LedgerError::EventNotFound => "EVENT_NOT_FOUND",
            LedgerError::AlreadyPurchased => "ALREADY_PURCHASED",
            LedgerError::EventFull => "EVENT_FULL",
            LedgerError::AlreadyClaimed => "ALREADY_CLAIMED",
            LedgerError::NotCancelled => "NOT_CANCELLED",
            LedgerError::InvalidDate => "INVALID_DATE",
            LedgerError::InvalidCapacity => "INVALID_CAPACITY",
            LedgerError::EventCancelled => "EVENT_CANCELLED",
            LedgerError::EventExpired => "EVENT_EXPIRED",
            LedgerError::AlreadyCancelled => "ALREADY_CANCELLED",
            LedgerError::NoPurchaseFound => "NO_PURCHASE_FOUND",
            LedgerError::PaymentFailed(_) => "PAYMENT_FAILED",
            LedgerError::PayoutFailed(_) => "PAYOUT_FAILED",
        }
    }

    /// Failure classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::EventNotFound | LedgerError::NoPurchaseFound => ErrorKind::NotFound,
            LedgerError::Unauthorized => ErrorKind::Authorization,
            LedgerError::PaymentFailed(_) | LedgerError::PayoutFailed(_) => ErrorKind::Transfer,
            _ => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_contract_codes() {
        assert_eq!(LedgerError::Unauthorized.code(), 1);
        assert_eq!(LedgerError::InvalidAmount.code(), 2);
        assert_eq!(LedgerError::EventNotFound.code(), 4);
        assert_eq!(LedgerError::InvalidDate.code(), 9);
    }

    #[test]
    fn codes_are_unique() {
        let all = [
            LedgerError::Unauthorized,
            LedgerError::InvalidAmount,
            LedgerError::EventExists,
            LedgerError::EventNotFound,
            LedgerError::AlreadyPurchased,
            LedgerError::EventFull,
            LedgerError::AlreadyClaimed,
            LedgerError::NotCancelled,
            LedgerError::InvalidDate,
            LedgerError::InvalidCapacity,
            LedgerError::EventCancelled,
            LedgerError::EventExpired,
            LedgerError::AlreadyCancelled,
            LedgerError::NoPurchaseFound,
            LedgerError::PaymentFailed(TransferError::ZeroAmount),
            LedgerError::PayoutFailed(TransferError::ZeroAmount),
        ];
        let mut codes: Vec<u32> = all.iter().map(LedgerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn kinds() {
        assert_eq!(LedgerError::EventNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(LedgerError::Unauthorized.kind(), ErrorKind::Authorization);
        assert_eq!(LedgerError::EventFull.kind(), ErrorKind::Validation);
        assert_eq!(
            LedgerError::PayoutFailed(TransferError::ZeroAmount).kind(),
            ErrorKind::Transfer
        );
    }
}
