//! Transaction boundary wrapping escrow transfers and ledger mutations.
//!
//! Every mutation records how to undo itself. `commit` keeps the changes;
//! dropping the unit of work without committing undoes them in reverse
//! order, issuing compensating transfers for any funds already moved.

use eventcover_canonical::Principal;
use tracing::{error, warn};

use crate::errors::{LedgerError, TransferError};
use crate::escrow::{Account, Escrow};
use crate::state::LedgerState;
use crate::types::{BlockHeight, EventId, EventRecord, PurchaseRecord};

#[derive(Debug)]
enum Undo {
    RemoveEvent(EventId),
    RestoreEvent(EventId, EventRecord),
    RemovePurchase(EventId, Principal),
    RestorePurchase(EventId, Principal, PurchaseRecord),
    ReverseTransfer {
        from: Account,
        to: Account,
        amount: u64,
    },
}

/// An open transaction against a ledger.
pub struct UnitOfWork<'a, E: Escrow> {
    state: &'a mut LedgerState,
    escrow: &'a mut E,
    now: BlockHeight,
    undo: Vec<Undo>,
    committed: bool,
}

impl<'a, E: Escrow> UnitOfWork<'a, E> {
    pub(crate) fn new(state: &'a mut LedgerState, escrow: &'a mut E, now: BlockHeight) -> Self {
        Self {
            state,
            escrow,
            now,
            undo: Vec::new(),
            committed: false,
        }
    }

    /// Height read from the clock when the transaction began.
    pub fn now(&self) -> BlockHeight {
        self.now
    }

    /// Read view of the stores, including this transaction's own writes.
    pub fn state(&self) -> &LedgerState {
        &*self.state
    }

    /// Read view of the escrow.
    pub fn escrow(&self) -> &E {
        &*self.escrow
    }

    /// Inserts a new event record.
    pub fn insert_event(&mut self, id: EventId, record: EventRecord) {
        match self.state.insert_event(id, record) {
            Some(previous) => self.undo.push(Undo::RestoreEvent(id, previous)),
            None => self.undo.push(Undo::RemoveEvent(id)),
        }
    }

    /// Applies `f` to an existing event record.
    pub fn update_event<F>(&mut self, id: EventId, f: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut EventRecord),
    {
        let record = self.state.event_mut(id).ok_or(LedgerError::EventNotFound)?;
        self.undo.push(Undo::RestoreEvent(id, record.clone()));
        f(record);
        Ok(())
    }

    /// Inserts a new purchase record.
    pub fn insert_purchase(&mut self, id: EventId, participant: Principal, record: PurchaseRecord) {
        match self.state.insert_purchase(id, participant.clone(), record) {
            Some(previous) => self
                .undo
                .push(Undo::RestorePurchase(id, participant, previous)),
            None => self.undo.push(Undo::RemovePurchase(id, participant)),
        }
    }

    /// Applies `f` to an existing purchase record.
    pub fn update_purchase<F>(
        &mut self,
        id: EventId,
        participant: &Principal,
        f: F,
    ) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut PurchaseRecord),
    {
        let record = self
            .state
            .purchase_mut(id, participant)
            .ok_or(LedgerError::NoPurchaseFound)?;
        self.undo
            .push(Undo::RestorePurchase(id, participant.clone(), *record));
        f(record);
        Ok(())
    }

    /// Moves funds through the escrow; reversed on rollback.
    pub fn transfer(&mut self, from: &Account, to: &Account, amount: u64) -> Result<(), TransferError> {
        self.escrow.transfer(from, to, amount)?;
        self.undo.push(Undo::ReverseTransfer {
            from: to.clone(),
            to: from.clone(),
            amount,
        });
        Ok(())
    }

    /// Makes every change permanent.
    pub fn commit(mut self) {
        self.undo.clear();
        self.committed = true;
    }

    /// Discards every change. Equivalent to dropping.
    pub fn rollback(self) {}

    fn undo_all(&mut self) {
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::RemoveEvent(id) => {
                    self.state.remove_event(id);
                }
                Undo::RestoreEvent(id, record) => {
                    self.state.insert_event(id, record);
                }
                Undo::RemovePurchase(id, participant) => {
                    self.state.remove_purchase(id, &participant);
                }
                Undo::RestorePurchase(id, participant, record) => {
                    self.state.insert_purchase(id, participant, record);
                }
                Undo::ReverseTransfer { from, to, amount } => {
                    if let Err(e) = self.escrow.transfer(&from, &to, amount) {
                        error!(%from, %to, amount, error = %e, "compensating transfer failed");
                    }
                }
            }
        }
    }
}

impl<E: Escrow> Drop for UnitOfWork<'_, E> {
    fn drop(&mut self) {
        if !self.committed && !self.undo.is_empty() {
            warn!(steps = self.undo.len(), "rolling back uncommitted unit of work");
            self.undo_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escrow::WalletEscrow;
    use crate::types::EventStatus;

    fn organizer() -> Principal {
        Principal::parse("org:acme").unwrap()
    }

    fn record() -> EventRecord {
        EventRecord {
            organizer: organizer(),
            event_date: BlockHeight(100),
            premium_amount: 10,
            max_participants: 2,
            current_participants: 0,
            status: EventStatus::Active,
            total_pool: 0,
        }
    }

    #[test]
    fn drop_undoes_inserts_and_transfers() {
        let mut state = LedgerState::new();
        let mut escrow = WalletEscrow::new();
        let payer = Principal::parse("human:payer").unwrap();
        escrow.deposit(&payer, 50).unwrap();
        let before_state = state.clone();
        let before_escrow = escrow.clone();

        {
            let mut uow = UnitOfWork::new(&mut state, &mut escrow, BlockHeight(1));
            uow.insert_event(EventId(1), record());
            uow.transfer(&Account::Principal(payer.clone()), &Account::Pool, 10)
                .unwrap();
            uow.insert_purchase(
                EventId(1),
                payer.clone(),
                PurchaseRecord {
                    amount_paid: 10,
                    claimed: false,
                },
            );
            uow.update_event(EventId(1), |e| e.current_participants += 1)
                .unwrap();
        }

        assert_eq!(state, before_state);
        assert_eq!(escrow, before_escrow);
    }

    #[test]
    fn commit_keeps_changes() {
        let mut state = LedgerState::new();
        let mut escrow = WalletEscrow::new();
        {
            let mut uow = UnitOfWork::new(&mut state, &mut escrow, BlockHeight(1));
            uow.insert_event(EventId(7), record());
            uow.commit();
        }
        assert!(state.event(EventId(7)).is_some());
    }

    #[test]
    fn update_restores_previous_value() {
        let mut state = LedgerState::new();
        let mut escrow = WalletEscrow::new();
        state.insert_event(EventId(1), record());
        {
            let mut uow = UnitOfWork::new(&mut state, &mut escrow, BlockHeight(1));
            uow.update_event(EventId(1), |e| e.status = EventStatus::Cancelled)
                .unwrap();
            assert_eq!(
                uow.state().event(EventId(1)).unwrap().status,
                EventStatus::Cancelled
            );
            uow.rollback();
        }
        assert_eq!(
            state.event(EventId(1)).unwrap().status,
            EventStatus::Active
        );
    }

    #[test]
    fn update_missing_records_fail() {
        let mut state = LedgerState::new();
        let mut escrow = WalletEscrow::new();
        let mut uow = UnitOfWork::new(&mut state, &mut escrow, BlockHeight(1));
        assert_eq!(
            uow.update_event(EventId(1), |_| {}),
            Err(LedgerError::EventNotFound)
        );
        assert_eq!(
            uow.update_purchase(EventId(1), &organizer(), |_| {}),
            Err(LedgerError::NoPurchaseFound)
        );
    }
}
