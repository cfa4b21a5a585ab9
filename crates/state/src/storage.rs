//! Storage slots and the in-memory state maps.

use crate::Account;
use primitives::{Address, HashMap, U256};

/// All accounts touched during a transaction, keyed by address.
pub type EvmState = HashMap<Address, Account>;

/// Per-account storage cache.
pub type EvmStorage = HashMap<U256, StorageSlot>;

/// EIP-1153 transient storage: per-transaction, dropped at transaction end
/// no matter how the transaction finished.
pub type TransientStorage = HashMap<(Address, U256), U256>;

/// One storage slot as seen by the current transaction.
///
/// `original_value` is the value at transaction start and never changes once
/// the slot is loaded; the EIP-2200/3529 SSTORE schedules price transitions
/// against it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageSlot {
    /// Value of the slot when the transaction started.
    pub original_value: U256,
    /// Current value of the slot.
    pub present_value: U256,
    /// EIP-2929 warmth. Slots start cold and warm up on first access.
    is_cold: bool,
}

impl StorageSlot {
    /// A freshly loaded slot: present equals original, still cold.
    pub fn new(value: U256) -> Self {
        Self {
            original_value: value,
            present_value: value,
            is_cold: true,
        }
    }

    /// A slot with an in-flight change, used when seeding test fixtures.
    pub fn new_changed(original_value: U256, present_value: U256) -> Self {
        Self {
            original_value,
            present_value,
            is_cold: true,
        }
    }

    /// Returns `true` if the present value differs from the original.
    pub fn is_changed(&self) -> bool {
        self.original_value != self.present_value
    }

    /// Whether the slot has been accessed this transaction.
    pub fn is_warm(&self) -> bool {
        !self.is_cold
    }

    /// Warms the slot up, returning whether it was cold before.
    pub fn mark_warm(&mut self) -> bool {
        core::mem::replace(&mut self.is_cold, false)
    }

    /// Cools the slot down again; used when reverting a warm-up entry.
    pub fn mark_cold(&mut self) {
        self.is_cold = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warmth_transitions_once() {
        let mut slot = StorageSlot::new(U256::from(7));
        assert!(slot.mark_warm());
        assert!(!slot.mark_warm());
        slot.mark_cold();
        assert!(slot.mark_warm());
    }

    #[test]
    fn change_tracking_is_against_original() {
        let mut slot = StorageSlot::new(U256::from(1));
        slot.present_value = U256::from(2);
        assert!(slot.is_changed());
        slot.present_value = U256::from(1);
        assert!(!slot.is_changed());
    }
}
