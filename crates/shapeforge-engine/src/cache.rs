//! Per-family strategy cache.
//!
//! One entry per type identity, stored in an arena and addressed by [`Slot`].
//! A slot is handed out before its strategy exists, so a type that refers
//! back to itself can capture the slot while it is still pending. Strategies
//! only dereference slots when they run, by which point every slot of a
//! finished session is either resolved or failed.

use std::collections::HashMap;

use shapeforge_core::TypeId;

use crate::error::BuildError;

/// Reference to a cache entry, stable for the cache's lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Slot(u32);

impl Slot {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
enum Entry<N> {
    Pending,
    Resolved(N),
    Failed(BuildError),
}

/// Observable state of a slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlotState {
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug)]
pub struct StrategyCache<N> {
    entries: Vec<Entry<N>>,
    types: Vec<TypeId>,
    by_type: HashMap<TypeId, Slot>,
}

impl<N> Default for StrategyCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> StrategyCache<N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            types: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Return the existing slot for `type_id`, or register a pending one.
    ///
    /// The flag is `true` when the entry already existed (in any state).
    pub fn get_or_register_placeholder(&mut self, type_id: TypeId) -> (bool, Slot) {
        if let Some(&slot) = self.by_type.get(&type_id) {
            return (true, slot);
        }

        let slot = Slot(self.entries.len() as u32);
        self.entries.push(Entry::Pending);
        self.types.push(type_id);
        self.by_type.insert(type_id, slot);
        (false, slot)
    }

    /// Fill a pending slot with its finished strategy.
    pub fn finalize(&mut self, slot: Slot, node: N) {
        self.ensure_pending(slot);
        self.entries[slot.index()] = Entry::Resolved(node);
    }

    /// Record that synthesis failed for a pending slot.
    pub fn fail(&mut self, slot: Slot, error: BuildError) {
        self.ensure_pending(slot);
        self.entries[slot.index()] = Entry::Failed(error);
    }

    /// Replace a finished strategy with a failure.
    ///
    /// Used when a strategy captured a slot that later failed.
    pub fn invalidate(&mut self, slot: Slot, error: BuildError) {
        if let Entry::Resolved(_) = self.entries[slot.index()] {
            self.entries[slot.index()] = Entry::Failed(error);
        }
    }

    /// Invocation-time dereference.
    ///
    /// # Panics
    /// Panics if the slot is still pending.
    pub fn get(&self, slot: Slot) -> Result<&N, &BuildError> {
        match &self.entries[slot.index()] {
            Entry::Resolved(node) => Ok(node),
            Entry::Failed(error) => Err(error),
            Entry::Pending => self.pending_dereference(slot),
        }
    }

    /// Recorded outcome of a slot, cloned for returning to callers.
    pub fn outcome(&self, slot: Slot) -> Option<Result<(), BuildError>> {
        match &self.entries[slot.index()] {
            Entry::Resolved(_) => Some(Ok(())),
            Entry::Failed(error) => Some(Err(error.clone())),
            Entry::Pending => None,
        }
    }

    pub fn state(&self, slot: Slot) -> SlotState {
        match self.entries[slot.index()] {
            Entry::Pending => SlotState::Pending,
            Entry::Resolved(_) => SlotState::Resolved,
            Entry::Failed(_) => SlotState::Failed,
        }
    }

    pub fn slot_of(&self, type_id: TypeId) -> Option<Slot> {
        self.by_type.get(&type_id).copied()
    }

    pub fn type_of(&self, slot: Slot) -> TypeId {
        self.types[slot.index()]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries still waiting for `finalize` or `fail`.
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Pending))
            .count()
    }
}
