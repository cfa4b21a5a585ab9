//! Accounts and their per-transaction status flags.

use crate::storage::EvmStorage;
use bitflags::bitflags;
use bytecode::Bytecode;
use primitives::{Address, Hardfork, B256, KECCAK_EMPTY, U256};

/// An account as tracked by the journal during a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    /// Balance, nonce and code.
    pub info: AccountInfo,
    /// Storage slots touched this transaction.
    pub storage: EvmStorage,
    /// Transaction-scoped status flags.
    pub status: AccountStatus,
}

bitflags! {
    /// Status flags accumulated while a transaction runs.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AccountStatus: u8 {
        /// Created during this transaction; its storage needs no database
        /// reads and EIP-6780 allows SELFDESTRUCT to actually delete it.
        const Created = 0b0000_0001;
        /// Marked for deletion by SELFDESTRUCT.
        const SelfDestructed = 0b0000_0010;
        /// Interacted with in a way that must be persisted; untouched
        /// accounts never reach the final state set.
        const Touched = 0b0000_0100;
        /// The database had no entry for this address.
        const LoadedAsNotExisting = 0b0000_1000;
        /// EIP-2929 warmth; set on first access in the transaction.
        const Warm = 0b0001_0000;
    }
}

impl Account {
    /// An account the database does not know: everything zero.
    pub fn new_not_existing() -> Self {
        Self {
            info: AccountInfo::default(),
            storage: EvmStorage::default(),
            status: AccountStatus::LoadedAsNotExisting,
        }
    }

    /// EIP-161 emptiness: no code, zero nonce, zero balance.
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// Emptiness as the active fork sees it: before Spurious Dragon a
    /// loaded-as-missing account is "non-existent" rather than "empty".
    pub fn state_clear_aware_is_empty(&self, spec: Hardfork) -> bool {
        if spec.is_enabled_in(Hardfork::SpuriousDragon) {
            self.is_empty()
        } else {
            self.status.contains(AccountStatus::LoadedAsNotExisting)
        }
    }

    /// Marks the account warm, returning whether it was cold before.
    pub fn mark_warm(&mut self) -> bool {
        let was_cold = !self.status.contains(AccountStatus::Warm);
        self.status |= AccountStatus::Warm;
        was_cold
    }

    /// Cools the account again; used when reverting a warm-up entry.
    pub fn mark_cold(&mut self) {
        self.status -= AccountStatus::Warm;
    }

    /// Marks the account as touched.
    pub fn mark_touch(&mut self) {
        self.status |= AccountStatus::Touched;
    }

    /// Clears the touched flag on revert.
    pub fn unmark_touch(&mut self) {
        self.status -= AccountStatus::Touched;
    }

    /// Whether the account was touched this transaction.
    pub fn is_touched(&self) -> bool {
        self.status.contains(AccountStatus::Touched)
    }

    /// Marks the account as created this transaction.
    pub fn mark_created(&mut self) {
        self.status |= AccountStatus::Created;
    }

    /// Clears the created flag on revert.
    pub fn unmark_created(&mut self) {
        self.status -= AccountStatus::Created;
    }

    /// Whether the account was created this transaction.
    pub fn is_created(&self) -> bool {
        self.status.contains(AccountStatus::Created)
    }

    /// Marks the account for deletion at transaction end.
    pub fn mark_selfdestruct(&mut self) {
        self.status |= AccountStatus::SelfDestructed;
    }

    /// Clears the deletion mark on revert.
    pub fn unmark_selfdestruct(&mut self) {
        self.status -= AccountStatus::SelfDestructed;
    }

    /// Whether the account is marked for deletion.
    pub fn is_selfdestructed(&self) -> bool {
        self.status.contains(AccountStatus::SelfDestructed)
    }
}

impl From<AccountInfo> for Account {
    fn from(info: AccountInfo) -> Self {
        Self {
            info,
            storage: EvmStorage::default(),
            status: AccountStatus::empty(),
        }
    }
}

/// Balance, nonce and code of an account.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountInfo {
    /// Balance in wei.
    pub balance: U256,
    /// Number of transactions sent (or contracts created) by this account.
    pub nonce: u64,
    /// Keccak-256 of the account code; [`KECCAK_EMPTY`] for none.
    pub code_hash: B256,
    /// The code itself, lazily attached; resolved through the code store
    /// by hash when `None`.
    pub code: Option<Bytecode>,
    /// EIP-7702 delegation target, mirrored out of the code designator so
    /// state inspection does not need to parse code.
    pub delegated_address: Option<Address>,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            balance: U256::ZERO,
            nonce: 0,
            code_hash: KECCAK_EMPTY,
            code: None,
            delegated_address: None,
        }
    }
}

/// Code identity is the hash; the attached bytes are a cache.
impl PartialEq for AccountInfo {
    fn eq(&self, other: &Self) -> bool {
        self.balance == other.balance
            && self.nonce == other.nonce
            && self.code_hash == other.code_hash
    }
}

impl AccountInfo {
    /// Account with the given balance and nothing else.
    pub fn from_balance(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Account with code attached; the hash and the delegation mirror are
    /// derived from it.
    pub fn with_code(mut self, code: Bytecode) -> Self {
        self.code_hash = code.hash_slow();
        self.delegated_address = code.eip7702_address();
        self.code = Some(code);
        self
    }

    /// EIP-161 emptiness: no code, zero nonce, zero balance.
    pub fn is_empty(&self) -> bool {
        self.code_hash == KECCAK_EMPTY && self.nonce == 0 && self.balance.is_zero()
    }

    /// Returns `true` if the account carries code.
    pub fn has_code(&self) -> bool {
        self.code_hash != KECCAK_EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;

    #[test]
    fn empty_account_predicate() {
        let mut info = AccountInfo::default();
        assert!(info.is_empty());
        info.nonce = 1;
        assert!(!info.is_empty());
    }

    #[test]
    fn state_clear_awareness() {
        let account = Account::new_not_existing();
        assert!(account.state_clear_aware_is_empty(Hardfork::SpuriousDragon));
        assert!(account.state_clear_aware_is_empty(Hardfork::Homestead));

        let loaded = Account::from(AccountInfo::default());
        assert!(loaded.state_clear_aware_is_empty(Hardfork::SpuriousDragon));
        assert!(!loaded.state_clear_aware_is_empty(Hardfork::Homestead));
    }

    #[test]
    fn with_code_mirrors_delegation() {
        let target = address!("1234000000000000000000000000000000005678");
        let info = AccountInfo::default().with_code(Bytecode::new_eip7702(target));
        assert_eq!(info.delegated_address, Some(target));
        assert!(info.has_code());
    }

    #[test]
    fn warmth_round_trip() {
        let mut account = Account::new_not_existing();
        assert!(account.mark_warm());
        assert!(!account.mark_warm());
        account.mark_cold();
        assert!(account.mark_warm());
    }
}
