use std::collections::BTreeMap;

use eventcover_canonical::Principal;

use crate::types::{EventId, EventRecord, PurchaseRecord};

/// The Event Registry and the Purchase Ledger.
///
/// Read access is public; mutation goes through a
/// [`UnitOfWork`](crate::UnitOfWork) so every change can be undone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    events: BTreeMap<EventId, EventRecord>,
    purchases: BTreeMap<EventId, BTreeMap<Principal, PurchaseRecord>>,
}

impl LedgerState {
    /// Creates empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an event.
    pub fn event(&self, id: EventId) -> Option<&EventRecord> {
        self.events.get(&id)
    }

    /// Looks up a participant's purchase for an event.
    pub fn purchase(&self, id: EventId, participant: &Principal) -> Option<&PurchaseRecord> {
        self.purchases.get(&id).and_then(|m| m.get(participant))
    }

    /// All events in identifier order.
    pub fn events(&self) -> impl Iterator<Item = (EventId, &EventRecord)> {
        self.events.iter().map(|(id, rec)| (*id, rec))
    }

    /// All purchases for one event, in participant order.
    pub fn purchases_for(
        &self,
        id: EventId,
    ) -> impl Iterator<Item = (&Principal, &PurchaseRecord)> {
        self.purchases.get(&id).into_iter().flat_map(|m| m.iter())
    }

    /// Number of registered events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn insert_event(&mut self, id: EventId, record: EventRecord) -> Option<EventRecord> {
        self.events.insert(id, record)
    }

    pub(crate) fn remove_event(&mut self, id: EventId) -> Option<EventRecord> {
        self.events.remove(&id)
    }

    pub(crate) fn event_mut(&mut self, id: EventId) -> Option<&mut EventRecord> {
        self.events.get_mut(&id)
    }

    pub(crate) fn insert_purchase(
        &mut self,
        id: EventId,
        participant: Principal,
        record: PurchaseRecord,
    ) -> Option<PurchaseRecord> {
        self.purchases
            .entry(id)
            .or_default()
            .insert(participant, record)
    }

    pub(crate) fn remove_purchase(
        &mut self,
        id: EventId,
        participant: &Principal,
    ) -> Option<PurchaseRecord> {
        let per_event = self.purchases.get_mut(&id)?;
        let removed = per_event.remove(participant);
        if per_event.is_empty() {
            self.purchases.remove(&id);
        }
        removed
    }

    pub(crate) fn purchase_mut(
        &mut self,
        id: EventId,
        participant: &Principal,
    ) -> Option<&mut PurchaseRecord> {
        self.purchases.get_mut(&id).and_then(|m| m.get_mut(participant))
    }
}
