//! Reversible journal entries.

use primitives::{Address, B256, U256};
use state::{Bytecode, EvmState, TransientStorage};

/// One reversible state mutation.
///
/// Entries are appended in execution order and replayed in reverse on
/// revert; each variant stores exactly what its inverse needs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JournalEntry {
    /// Account became warm (EIP-2929).
    /// Revert: mark it cold again.
    AccountWarmed {
        /// Warmed account.
        address: Address,
    },
    /// Storage slot became warm (EIP-2929), via SLOAD or SSTORE.
    /// Revert: mark the slot cold.
    StorageWarmed {
        /// Account owning the slot.
        address: Address,
        /// Slot key.
        key: U256,
    },
    /// Account was touched and will be persisted (EIP-161 relevant).
    /// Revert: clear the touched flag.
    AccountTouched {
        /// Touched account.
        address: Address,
    },
    /// Account was created by CREATE/CREATE2.
    /// Revert: clear the created flag and reset the nonce to zero.
    AccountCreated {
        /// Created account.
        address: Address,
    },
    /// Balance overwritten by the host.
    /// Revert: restore the previous balance.
    BalanceChange {
        /// Account whose balance changed.
        address: Address,
        /// Balance before the change.
        old_balance: U256,
    },
    /// Value moved between two accounts.
    /// Revert: move it back.
    BalanceTransfer {
        /// Sender.
        from: Address,
        /// Receiver.
        to: Address,
        /// Amount moved.
        balance: U256,
    },
    /// Nonce overwritten (increment or host set).
    /// Revert: restore the previous nonce.
    NonceChange {
        /// Account whose nonce changed.
        address: Address,
        /// Nonce before the change.
        old_nonce: u64,
    },
    /// Code attached to an account.
    /// Revert: restore the previous code, hash and delegation mirror.
    CodeChange {
        /// Account whose code changed.
        address: Address,
        /// Code hash before the change.
        old_code_hash: B256,
        /// Code before the change, if it was attached.
        old_code: Option<Bytecode>,
        /// Delegation mirror before the change.
        old_delegated_address: Option<Address>,
    },
    /// Storage slot overwritten.
    /// Revert: restore the previous present value.
    StorageChanged {
        /// Account owning the slot.
        address: Address,
        /// Slot key.
        key: U256,
        /// Present value before the store.
        had_value: U256,
    },
    /// Transient storage slot overwritten (EIP-1153).
    /// Revert: restore the previous value, removing zero entries.
    TransientStorageChange {
        /// Account owning the slot.
        address: Address,
        /// Slot key.
        key: U256,
        /// Value before the store.
        had_value: U256,
    },
    /// Contract marked for destruction, balance moved to the beneficiary.
    /// Revert: unmark (unless it was already destroyed) and move the
    /// balance back.
    AccountDestroyed {
        /// Destroyed contract.
        address: Address,
        /// Balance beneficiary.
        target: Address,
        /// The contract was already marked destroyed this transaction.
        was_destroyed: bool,
        /// Balance moved to the beneficiary.
        had_balance: U256,
    },
}

impl JournalEntry {
    /// Undoes this entry. Accounts referenced by an entry are guaranteed to
    /// be present in `state`: they were loaded before the entry was written.
    pub fn revert(self, state: &mut EvmState, transient_storage: &mut TransientStorage) {
        match self {
            Self::AccountWarmed { address } => {
                state.get_mut(&address).unwrap().mark_cold();
            }
            Self::StorageWarmed { address, key } => {
                state
                    .get_mut(&address)
                    .unwrap()
                    .storage
                    .get_mut(&key)
                    .unwrap()
                    .mark_cold();
            }
            Self::AccountTouched { address } => {
                state.get_mut(&address).unwrap().unmark_touch();
            }
            Self::AccountCreated { address } => {
                let account = state.get_mut(&address).unwrap();
                account.unmark_created();
                // Only nonce-zero accounts can be created, so zero is the
                // exact previous value.
                account.info.nonce = 0;
            }
            Self::BalanceChange {
                address,
                old_balance,
            } => {
                state.get_mut(&address).unwrap().info.balance = old_balance;
            }
            Self::BalanceTransfer { from, to, balance } => {
                // Both moves succeeded going forward, so neither can
                // overflow going back.
                state.get_mut(&to).unwrap().info.balance -= balance;
                state.get_mut(&from).unwrap().info.balance += balance;
            }
            Self::NonceChange { address, old_nonce } => {
                state.get_mut(&address).unwrap().info.nonce = old_nonce;
            }
            Self::CodeChange {
                address,
                old_code_hash,
                old_code,
                old_delegated_address,
            } => {
                let info = &mut state.get_mut(&address).unwrap().info;
                info.code_hash = old_code_hash;
                info.code = old_code;
                info.delegated_address = old_delegated_address;
            }
            Self::StorageChanged {
                address,
                key,
                had_value,
            } => {
                state
                    .get_mut(&address)
                    .unwrap()
                    .storage
                    .get_mut(&key)
                    .unwrap()
                    .present_value = had_value;
            }
            Self::TransientStorageChange {
                address,
                key,
                had_value,
            } => {
                if had_value.is_zero() {
                    transient_storage.remove(&(address, key));
                } else {
                    transient_storage.insert((address, key), had_value);
                }
            }
            Self::AccountDestroyed {
                address,
                target,
                was_destroyed,
                had_balance,
            } => {
                let account = state.get_mut(&address).unwrap();
                if !was_destroyed {
                    account.unmark_selfdestruct();
                }
                account.info.balance += had_balance;
                if address != target {
                    state.get_mut(&target).unwrap().info.balance -= had_balance;
                }
            }
        }
    }
}
