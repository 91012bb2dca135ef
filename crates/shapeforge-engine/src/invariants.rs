//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::cache::{Slot, SlotState, StrategyCache};

impl<N> StrategyCache<N> {
    pub(crate) fn ensure_pending(&self, slot: Slot) {
        let state = self.state(slot);
        if state != SlotState::Pending {
            panic!(
                "StrategyCache: slot {} for type id {} is already {state:?} \
                 (each type is finalized once per session)",
                slot.index(),
                self.type_of(slot).0
            );
        }
    }

    pub(crate) fn pending_dereference(&self, slot: Slot) -> ! {
        panic!(
            "StrategyCache: slot {} for type id {} dereferenced while pending \
             (strategies must not run before their session completes)",
            slot.index(),
            self.type_of(slot).0
        )
    }
}
