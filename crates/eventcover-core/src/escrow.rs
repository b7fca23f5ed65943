use std::collections::BTreeMap;
use std::fmt;

use eventcover_canonical::Principal;
use serde::{Deserialize, Serialize};

use crate::errors::TransferError;

/// Source or destination of an escrow transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Account {
    /// A principal's own funds.
    Principal(Principal),
    /// The contract's pooled escrow balance.
    Pool,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Principal(p) => write!(f, "{}", p),
            Account::Pool => f.write_str("pool"),
        }
    }
}

/// Value-transfer capability consumed by purchase and claim.
///
/// A failed transfer must leave every balance untouched.
pub trait Escrow {
    /// Moves `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Account, to: &Account, amount: u64) -> Result<(), TransferError>;

    /// Current balance of `account`.
    fn balance(&self, account: &Account) -> u64;
}

/// Escrow backed by in-process wallet balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletEscrow {
    wallets: BTreeMap<Principal, u64>,
    pool: u64,
}

impl WalletEscrow {
    /// Creates an escrow with no balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `principal`'s wallet from outside the ledger.
    pub fn deposit(&mut self, principal: &Principal, amount: u64) -> Result<(), TransferError> {
        self.check_deposit(principal, amount)?;
        *self.wallets.entry(principal.clone()).or_insert(0) += amount;
        Ok(())
    }

    /// Checks that `deposit` would succeed without applying it.
    pub fn check_deposit(&self, principal: &Principal, amount: u64) -> Result<(), TransferError> {
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }
        let current = self.wallets.get(principal).copied().unwrap_or(0);
        current
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| TransferError::Overflow(Account::Principal(principal.clone())))
    }

    /// Wallets with a non-zero balance.
    pub fn wallets(&self) -> impl Iterator<Item = (&Principal, u64)> {
        self.wallets.iter().map(|(p, b)| (p, *b)).filter(|(_, b)| *b > 0)
    }

    fn slot(&mut self, account: &Account) -> &mut u64 {
        match account {
            Account::Principal(p) => self.wallets.entry(p.clone()).or_insert(0),
            Account::Pool => &mut self.pool,
        }
    }
}

impl Escrow for WalletEscrow {
    fn transfer(&mut self, from: &Account, to: &Account, amount: u64) -> Result<(), TransferError> {
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }
        let available = self.balance(from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                account: from.clone(),
                available,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        // Check the credit before debiting so a failure moves nothing.
        self.balance(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow(to.clone()))?;

        *self.slot(from) -= amount;
        *self.slot(to) += amount;
        Ok(())
    }

    fn balance(&self, account: &Account) -> u64 {
        match account {
            Account::Principal(p) => self.wallets.get(p).copied().unwrap_or(0),
            Account::Pool => self.pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal::parse("human:alice").unwrap()
    }

    #[test]
    fn transfer_moves_funds_into_pool() {
        let mut escrow = WalletEscrow::new();
        escrow.deposit(&alice(), 100).unwrap();
        escrow
            .transfer(&Account::Principal(alice()), &Account::Pool, 40)
            .unwrap();
        assert_eq!(escrow.balance(&Account::Principal(alice())), 60);
        assert_eq!(escrow.balance(&Account::Pool), 40);
    }

    #[test]
    fn insufficient_funds_moves_nothing() {
        let mut escrow = WalletEscrow::new();
        escrow.deposit(&alice(), 10).unwrap();
        let err = escrow
            .transfer(&Account::Principal(alice()), &Account::Pool, 11)
            .unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientFunds {
                account: Account::Principal(alice()),
                available: 10,
                required: 11
            }
        );
        assert_eq!(escrow.balance(&Account::Principal(alice())), 10);
        assert_eq!(escrow.balance(&Account::Pool), 0);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut escrow = WalletEscrow::new();
        assert_eq!(
            escrow.transfer(&Account::Pool, &Account::Principal(alice()), 0),
            Err(TransferError::ZeroAmount)
        );
        assert_eq!(escrow.deposit(&alice(), 0), Err(TransferError::ZeroAmount));
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut escrow = WalletEscrow::new();
        escrow.deposit(&alice(), u64::MAX).unwrap();
        assert!(matches!(
            escrow.deposit(&alice(), 1),
            Err(TransferError::Overflow(_))
        ));
        assert_eq!(escrow.balance(&Account::Principal(alice())), u64::MAX);
    }

    #[test]
    fn wallets_skips_empty_balances() {
        let mut escrow = WalletEscrow::new();
        escrow.deposit(&alice(), 5).unwrap();
        escrow
            .transfer(&Account::Principal(alice()), &Account::Pool, 5)
            .unwrap();
        assert_eq!(escrow.wallets().count(), 0);
    }
}
