use eventcover_canonical::Principal;

use crate::clock::Clock;
use crate::errors::LedgerError;
use crate::escrow::Escrow;
use crate::operations::{self, OperationReceipt};
use crate::state::LedgerState;
use crate::types::{EventId, EventParams, EventRecord, PurchaseRecord};
use crate::unit_of_work::UnitOfWork;

/// Owns the Event Registry, the Purchase Ledger and the escrow.
///
/// Each convenience method runs one operation in its own unit of work and
/// commits on success. Callers that need to do more inside the same
/// transaction (e.g. durably record it first) use [`Ledger::begin`].
#[derive(Debug, Clone, Default)]
pub struct Ledger<E: Escrow> {
    state: LedgerState,
    escrow: E,
}

impl<E: Escrow> Ledger<E> {
    /// Creates an empty ledger over `escrow`.
    pub fn new(escrow: E) -> Self {
        Self {
            state: LedgerState::new(),
            escrow,
        }
    }

    /// Opens a transaction reading the time once from `clock`.
    pub fn begin<C: Clock + ?Sized>(&mut self, clock: &C) -> UnitOfWork<'_, E> {
        UnitOfWork::new(&mut self.state, &mut self.escrow, clock.now())
    }

    /// Runs `register_event` and commits.
    pub fn register_event<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        caller: &Principal,
        params: EventParams,
    ) -> Result<OperationReceipt, LedgerError> {
        let mut uow = self.begin(clock);
        let receipt = operations::register_event(&mut uow, caller, params)?;
        uow.commit();
        Ok(receipt)
    }

    /// Runs `cancel_event` and commits.
    pub fn cancel_event<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        caller: &Principal,
        event_id: EventId,
    ) -> Result<OperationReceipt, LedgerError> {
        let mut uow = self.begin(clock);
        let receipt = operations::cancel_event(&mut uow, caller, event_id)?;
        uow.commit();
        Ok(receipt)
    }

    /// Runs `purchase_insurance` and commits.
    pub fn purchase_insurance<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        caller: &Principal,
        event_id: EventId,
    ) -> Result<OperationReceipt, LedgerError> {
        let mut uow = self.begin(clock);
        let receipt = operations::purchase_insurance(&mut uow, caller, event_id)?;
        uow.commit();
        Ok(receipt)
    }

    /// Runs `claim_insurance` and commits.
    pub fn claim_insurance<C: Clock + ?Sized>(
        &mut self,
        clock: &C,
        caller: &Principal,
        event_id: EventId,
    ) -> Result<OperationReceipt, LedgerError> {
        let mut uow = self.begin(clock);
        let receipt = operations::claim_insurance(&mut uow, caller, event_id)?;
        uow.commit();
        Ok(receipt)
    }

    /// The registry and purchase ledger.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Looks up an event.
    pub fn event(&self, id: EventId) -> Option<&EventRecord> {
        self.state.event(id)
    }

    /// Looks up a purchase.
    pub fn purchase(&self, id: EventId, participant: &Principal) -> Option<&PurchaseRecord> {
        self.state.purchase(id, participant)
    }

    /// All events in identifier order.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &EventRecord)> {
        self.state.events()
    }

    /// All purchases for one event, in participant order.
    pub fn purchases_for(
        &self,
        id: EventId,
    ) -> impl Iterator<Item = (&Principal, &PurchaseRecord)> {
        self.state.purchases_for(id)
    }

    /// The escrow.
    pub fn escrow(&self) -> &E {
        &self.escrow
    }

    /// Mutable escrow access for funding wallets outside of operations.
    pub fn escrow_mut(&mut self) -> &mut E {
        &mut self.escrow
    }
}
