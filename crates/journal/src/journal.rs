//! The journaled state manager.

use crate::{
    entry::JournalEntry,
    snapshot::{SnapshotError, SnapshotId, Snapshots},
    types::{AccountLoad, DelegateLoad, SStoreResult, SelfDestructResult, StateLoad, TransferError},
};
use database::Database;
use primitives::{
    hash_map::Entry, Address, Hardfork, HashSet, Log, B256, KECCAK_EMPTY, U256,
};
use state::{Account, Bytecode, EvmState, StorageSlot, TransientStorage};

/// A position in the journal that state can be rolled back to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JournalCheckpoint {
    /// Length of the entry log at checkpoint time.
    pub journal_i: usize,
    /// Length of the log buffer at checkpoint time.
    pub log_i: usize,
}

/// Touched state and logs of a finalized transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JournalOutput {
    /// Accounts to persist, EIP-161 filtered.
    pub state: EvmState,
    /// Logs emitted by the transaction.
    pub logs: Vec<Log>,
}

/// Journaled view over a [`Database`].
///
/// All reads go through here so that warmth, original storage values and
/// reversibility are tracked in one place. The entry log is flat and
/// append-only; a checkpoint is just a pair of lengths.
#[derive(Debug)]
pub struct Journal<DB> {
    /// Backing store consulted on state misses.
    pub database: DB,
    /// Accounts loaded or mutated this transaction.
    pub state: EvmState,
    /// EIP-1153 transient storage, dropped at transaction end.
    pub transient_storage: TransientStorage,
    /// Logs emitted so far.
    pub logs: Vec<Log>,
    /// Current call depth; incremented per checkpoint.
    pub depth: usize,
    /// Active hardfork.
    pub spec: Hardfork,
    /// Addresses that start the transaction warm: origin, target, coinbase
    /// (Shanghai+), precompiles and access-list entries.
    pub warm_preloaded_addresses: HashSet<Address>,
    /// Precompile addresses, treated as existing for CALL pricing.
    pub precompiles: HashSet<Address>,
    journal: Vec<JournalEntry>,
    snapshots: Snapshots,
}

impl<DB: Database> Journal<DB> {
    /// Creates an empty journal over `database`.
    pub fn new(spec: Hardfork, database: DB) -> Self {
        Self {
            database,
            state: EvmState::default(),
            transient_storage: TransientStorage::default(),
            logs: Vec::new(),
            depth: 0,
            spec,
            warm_preloaded_addresses: HashSet::default(),
            precompiles: HashSet::default(),
            journal: Vec::new(),
            snapshots: Snapshots::default(),
        }
    }

    /// Sets the active hardfork.
    pub fn set_spec(&mut self, spec: Hardfork) {
        self.spec = spec;
    }

    /// Current call depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of journal entries written so far.
    #[inline]
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// The already-loaded account at `address`.
    ///
    /// # Panics
    ///
    /// Panics if the account was never loaded this transaction.
    #[inline]
    pub fn account(&self, address: Address) -> &Account {
        self.state.get(&address).expect("account is loaded")
    }

    /// Loads an account, warming it up.
    pub fn load_account(&mut self, address: Address) -> Result<StateLoad<&mut Account>, DB::Error> {
        self.load_account_optional(address, false)
    }

    /// Loads an account and makes sure its code blob is attached.
    pub fn load_code(&mut self, address: Address) -> Result<StateLoad<&mut Account>, DB::Error> {
        self.load_account_optional(address, true)
    }

    /// Loads an account the way the CALL family needs it: emptiness for
    /// new-account pricing plus EIP-7702 delegate resolution.
    pub fn load_account_delegated(
        &mut self,
        address: Address,
    ) -> Result<StateLoad<AccountLoad>, DB::Error> {
        let spec = self.spec;
        let is_eip7702_enabled = spec.is_enabled_in(Hardfork::Prague);
        // Precompiles always count as existing for CALL pricing.
        let is_precompile = self.precompiles.contains(&address);
        let account = self.load_account_optional(address, is_eip7702_enabled)?;
        let is_empty = !is_precompile && account.data.state_clear_aware_is_empty(spec);
        let is_cold = account.is_cold;
        let delegate_target = account.data.info.delegated_address;

        let mut load = StateLoad::new(
            AccountLoad {
                is_empty,
                delegate: None,
            },
            is_cold,
        );
        if is_eip7702_enabled {
            if let Some(target) = delegate_target {
                let delegate = self.load_code(target)?;
                load.data.delegate = Some(DelegateLoad {
                    address: target,
                    is_cold: delegate.is_cold,
                });
            }
        }
        Ok(load)
    }

    fn load_account_optional(
        &mut self,
        address: Address,
        load_code: bool,
    ) -> Result<StateLoad<&mut Account>, DB::Error> {
        let is_cold = match self.state.entry(address) {
            Entry::Occupied(entry) => entry.into_mut().mark_warm(),
            Entry::Vacant(entry) => {
                let mut account = match self.database.basic(address)? {
                    Some(info) => Account::from(info),
                    None => Account::new_not_existing(),
                };
                account.mark_warm();
                entry.insert(account);
                // Preloaded addresses never pay the cold surcharge.
                !self.warm_preloaded_addresses.contains(&address)
            }
        };
        if is_cold {
            self.journal.push(JournalEntry::AccountWarmed { address });
        }
        if load_code {
            let info = &mut self.state.get_mut(&address).unwrap().info;
            if info.code.is_none() {
                let code = if info.code_hash == KECCAK_EMPTY {
                    Bytecode::default()
                } else {
                    self.database.code_by_hash(info.code_hash)?
                };
                info.delegated_address = code.eip7702_address();
                info.code = Some(code);
            }
        }
        Ok(StateLoad::new(
            self.state.get_mut(&address).unwrap(),
            is_cold,
        ))
    }

    /// Marks an account as touched; only touched accounts reach the final
    /// state set.
    pub fn touch(&mut self, address: Address) {
        if let Some(account) = self.state.get_mut(&address) {
            if !account.is_touched() {
                self.journal.push(JournalEntry::AccountTouched { address });
                account.mark_touch();
            }
        }
    }

    fn touch_loaded(journal: &mut Vec<JournalEntry>, address: Address, account: &mut Account) {
        if !account.is_touched() {
            journal.push(JournalEntry::AccountTouched { address });
            account.mark_touch();
        }
    }

    /// Reads a storage slot, warming it up and recording its original value
    /// on first access.
    ///
    /// # Panics
    ///
    /// Panics if the account was never loaded this transaction.
    pub fn sload(&mut self, address: Address, key: U256) -> Result<StateLoad<U256>, DB::Error> {
        let account = self.state.get_mut(&address).expect("account is loaded");
        let is_newly_created = account.is_created();
        let (value, is_cold) = match account.storage.entry(key) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                let is_cold = slot.mark_warm();
                (slot.present_value, is_cold)
            }
            Entry::Vacant(entry) => {
                // Accounts created this transaction have no persisted
                // storage to consult.
                let value = if is_newly_created {
                    U256::ZERO
                } else {
                    self.database.storage(address, key)?
                };
                let slot = entry.insert(StorageSlot::new(value));
                slot.mark_warm();
                (value, true)
            }
        };
        if is_cold {
            self.journal.push(JournalEntry::StorageWarmed { address, key });
        }
        Ok(StateLoad::new(value, is_cold))
    }

    /// Writes a storage slot, returning the transition triple the SSTORE
    /// schedules price.
    pub fn sstore(
        &mut self,
        address: Address,
        key: U256,
        new: U256,
    ) -> Result<StateLoad<SStoreResult>, DB::Error> {
        let present = self.sload(address, key)?;
        let account = self.state.get_mut(&address).unwrap();
        let slot = account.storage.get_mut(&key).unwrap();
        let result = SStoreResult {
            original_value: slot.original_value,
            present_value: present.data,
            new_value: new,
        };
        if present.data != new {
            self.journal.push(JournalEntry::StorageChanged {
                address,
                key,
                had_value: present.data,
            });
            slot.present_value = new;
        }
        Ok(StateLoad::new(result, present.is_cold))
    }

    /// Reads transient storage (EIP-1153). Absent keys read as zero.
    pub fn tload(&mut self, address: Address, key: U256) -> U256 {
        self.transient_storage
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    /// Writes transient storage (EIP-1153). Participates in revert; the
    /// whole map dies at transaction end either way.
    pub fn tstore(&mut self, address: Address, key: U256, new: U256) {
        let had_value = if new.is_zero() {
            self.transient_storage.remove(&(address, key))
        } else {
            let previous = self
                .transient_storage
                .insert((address, key), new)
                .unwrap_or_default();
            (previous != new).then_some(previous)
        };
        if let Some(had_value) = had_value {
            self.journal.push(JournalEntry::TransientStorageChange {
                address,
                key,
                had_value,
            });
        }
    }

    /// Appends a log.
    pub fn log(&mut self, log: Log) {
        self.logs.push(log);
    }

    /// Overwrites an account balance. The account must be loaded.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        let account = self.state.get_mut(&address).expect("account is loaded");
        Self::touch_loaded(&mut self.journal, address, account);
        self.journal.push(JournalEntry::BalanceChange {
            address,
            old_balance: account.info.balance,
        });
        account.info.balance = balance;
    }

    /// Increments an account nonce, returning the new value or `None` on
    /// overflow.
    pub fn inc_nonce(&mut self, address: Address) -> Option<u64> {
        let account = self.state.get_mut(&address).expect("account is loaded");
        let old_nonce = account.info.nonce;
        if old_nonce == u64::MAX {
            return None;
        }
        Self::touch_loaded(&mut self.journal, address, account);
        self.journal.push(JournalEntry::NonceChange { address, old_nonce });
        account.info.nonce = old_nonce + 1;
        Some(account.info.nonce)
    }

    /// Overwrites an account nonce. The account must be loaded.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        let account = self.state.get_mut(&address).expect("account is loaded");
        Self::touch_loaded(&mut self.journal, address, account);
        self.journal.push(JournalEntry::NonceChange {
            address,
            old_nonce: account.info.nonce,
        });
        account.info.nonce = nonce;
    }

    /// Attaches code to an account under a precomputed hash.
    pub fn set_code_with_hash(&mut self, address: Address, code: Bytecode, hash: B256) {
        let account = self.state.get_mut(&address).expect("account is loaded");
        Self::touch_loaded(&mut self.journal, address, account);
        self.journal.push(JournalEntry::CodeChange {
            address,
            old_code_hash: account.info.code_hash,
            old_code: account.info.code.take(),
            old_delegated_address: account.info.delegated_address,
        });
        account.info.code_hash = hash;
        account.info.delegated_address = code.eip7702_address();
        account.info.code = Some(code);
    }

    /// Attaches code to an account, hashing it first.
    pub fn set_code(&mut self, address: Address, code: Bytecode) {
        let hash = code.hash_slow();
        self.set_code_with_hash(address, code, hash);
    }

    /// Moves `balance` wei between two accounts.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        balance: U256,
    ) -> Result<Option<TransferError>, DB::Error> {
        if balance.is_zero() {
            self.load_account(to)?;
            let to_account = self.state.get_mut(&to).unwrap();
            Self::touch_loaded(&mut self.journal, to, to_account);
            return Ok(None);
        }
        self.load_account(from)?;
        self.load_account(to)?;

        let from_account = self.state.get_mut(&from).unwrap();
        Self::touch_loaded(&mut self.journal, from, from_account);
        let Some(new_from) = from_account.info.balance.checked_sub(balance) else {
            return Ok(Some(TransferError::OutOfFunds));
        };
        from_account.info.balance = new_from;

        let to_account = self.state.get_mut(&to).unwrap();
        Self::touch_loaded(&mut self.journal, to, to_account);
        let Some(new_to) = to_account.info.balance.checked_add(balance) else {
            // Roll the debit back by hand; no entry was written yet.
            self.state.get_mut(&from).unwrap().info.balance += balance;
            return Ok(Some(TransferError::OverflowPayment));
        };
        to_account.info.balance = new_to;

        self.journal
            .push(JournalEntry::BalanceTransfer { from, to, balance });
        Ok(None)
    }

    /// Prepares a CREATE target under a fresh checkpoint: collision check,
    /// created mark, EIP-161 nonce, value move. Caller and target must be
    /// loaded.
    pub fn create_account_checkpoint(
        &mut self,
        caller: Address,
        target: Address,
        balance: U256,
    ) -> Result<JournalCheckpoint, TransferError> {
        let checkpoint = self.checkpoint();

        let caller_balance = self.state.get(&caller).unwrap().info.balance;
        if caller_balance < balance {
            self.checkpoint_revert(checkpoint);
            return Err(TransferError::OutOfFunds);
        }

        let target_account = self.state.get_mut(&target).unwrap();
        if target_account.info.code_hash != KECCAK_EMPTY || target_account.info.nonce != 0 {
            self.checkpoint_revert(checkpoint);
            return Err(TransferError::CreateCollision);
        }

        target_account.mark_created();
        self.journal
            .push(JournalEntry::AccountCreated { address: target });
        let target_account = self.state.get_mut(&target).unwrap();
        target_account.info.code = None;
        if self.spec.is_enabled_in(Hardfork::SpuriousDragon) {
            // Reverted back to zero by the AccountCreated entry.
            target_account.info.nonce = 1;
        }
        Self::touch_loaded(&mut self.journal, target, target_account);

        let Some(new_balance) = target_account.info.balance.checked_add(balance) else {
            self.checkpoint_revert(checkpoint);
            return Err(TransferError::OverflowPayment);
        };
        target_account.info.balance = new_balance;
        self.state.get_mut(&caller).unwrap().info.balance -= balance;
        self.journal.push(JournalEntry::BalanceTransfer {
            from: caller,
            to: target,
            balance,
        });

        Ok(checkpoint)
    }

    /// Marks `address` for destruction, moving its balance to `target`.
    ///
    /// Cancun narrows actual deletion to contracts created in the same
    /// transaction (EIP-6780); otherwise only the balance moves.
    pub fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Result<StateLoad<SelfDestructResult>, DB::Error> {
        let spec = self.spec;
        let target_load = self.load_account(target)?;
        let is_cold = target_load.is_cold;
        let is_empty = target_load.data.state_clear_aware_is_empty(spec);

        if address != target {
            let balance = self.state.get(&address).unwrap().info.balance;
            let target_account = self.state.get_mut(&target).unwrap();
            Self::touch_loaded(&mut self.journal, target, target_account);
            target_account.info.balance += balance;
        }

        let account = self.state.get_mut(&address).unwrap();
        Self::touch_loaded(&mut self.journal, address, account);
        let account = self.state.get_mut(&address).unwrap();
        let balance = account.info.balance;
        let previously_destroyed = account.is_selfdestructed();
        let is_cancun_enabled = spec.is_enabled_in(Hardfork::Cancun);

        let entry = if account.is_created() || !is_cancun_enabled {
            account.mark_selfdestruct();
            account.info.balance = U256::ZERO;
            Some(JournalEntry::AccountDestroyed {
                address,
                target,
                was_destroyed: previously_destroyed,
                had_balance: balance,
            })
        } else if address != target {
            account.info.balance = U256::ZERO;
            Some(JournalEntry::BalanceTransfer {
                from: address,
                to: target,
                balance,
            })
        } else {
            // Cancun, pre-existing contract, self-beneficiary: no effect.
            None
        };
        if let Some(entry) = entry {
            self.journal.push(entry);
        }

        Ok(StateLoad::new(
            SelfDestructResult {
                had_value: !balance.is_zero(),
                target_exists: !is_empty,
                previously_destroyed,
            },
            is_cold,
        ))
    }

    /// Opens a frame checkpoint.
    pub fn checkpoint(&mut self) -> JournalCheckpoint {
        let checkpoint = JournalCheckpoint {
            journal_i: self.journal.len(),
            log_i: self.logs.len(),
        };
        self.depth += 1;
        checkpoint
    }

    /// Commits the innermost checkpoint; its entries merge into the
    /// enclosing one by staying in the log.
    pub fn checkpoint_commit(&mut self) {
        self.depth -= 1;
    }

    /// Reverts state to `checkpoint`, replaying entries in reverse.
    pub fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
        self.depth -= 1;
        self.revert_to_mark(checkpoint);
    }

    fn revert_to_mark(&mut self, checkpoint: JournalCheckpoint) {
        while self.journal.len() > checkpoint.journal_i {
            let entry = self.journal.pop().unwrap();
            entry.revert(&mut self.state, &mut self.transient_storage);
        }
        self.logs.truncate(checkpoint.log_i);
    }

    /// Takes a user-facing snapshot of the current state.
    pub fn snapshot(&mut self) -> SnapshotId {
        self.snapshots.register(JournalCheckpoint {
            journal_i: self.journal.len(),
            log_i: self.logs.len(),
        })
    }

    /// Reverts to a snapshot, consuming it. Ids are single-use; unknown or
    /// reused ids fail with [`SnapshotError::InvalidSnapshot`].
    pub fn revert_to_snapshot(&mut self, id: SnapshotId) -> Result<(), SnapshotError> {
        let checkpoint = self.snapshots.consume(id)?;
        self.revert_to_mark(checkpoint);
        Ok(())
    }

    /// Closes the transaction: returns touched state (EIP-161 filtered) and
    /// logs, and resets every per-transaction table, transient storage
    /// included.
    pub fn finalize(&mut self) -> JournalOutput {
        let is_spurious_dragon = self.spec.is_enabled_in(Hardfork::SpuriousDragon);
        let mut state = core::mem::take(&mut self.state);
        state.retain(|_, account| {
            account.is_touched() && !(is_spurious_dragon && account.is_empty())
        });
        let logs = core::mem::take(&mut self.logs);
        self.journal.clear();
        self.transient_storage.clear();
        self.warm_preloaded_addresses.clear();
        self.snapshots.clear();
        self.depth = 0;
        JournalOutput { state, logs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::InMemoryDb;
    use primitives::address;
    use state::AccountInfo;

    fn journal_with(
        spec: Hardfork,
        accounts: &[(Address, u64)],
    ) -> Journal<InMemoryDb> {
        let mut db = InMemoryDb::default();
        for (address, balance) in accounts {
            db.insert_account_info(*address, AccountInfo::from_balance(U256::from(*balance)));
        }
        Journal::new(spec, db)
    }

    const A: Address = address!("0000000000000000000000000000000000000a0a");
    const B: Address = address!("0000000000000000000000000000000000000b0b");

    #[test]
    fn checkpoint_revert_restores_prior_state() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 100), (B, 0)]);
        journal.load_account(A).unwrap();
        journal.load_account(B).unwrap();

        let checkpoint = journal.checkpoint();
        journal.transfer(A, B, U256::from(40)).unwrap();
        journal.sstore(A, U256::from(1), U256::from(7)).unwrap();
        assert_eq!(journal.account(B).info.balance, U256::from(40));

        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal.account(A).info.balance, U256::from(100));
        assert_eq!(journal.account(B).info.balance, U256::ZERO);
        assert_eq!(
            journal.sload(A, U256::from(1)).unwrap().data,
            U256::ZERO
        );
    }

    #[test]
    fn warmth_is_reverted_with_the_checkpoint() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 0)]);
        let checkpoint = journal.checkpoint();
        assert!(journal.load_account(A).unwrap().is_cold);
        assert!(!journal.load_account(A).unwrap().is_cold);
        journal.checkpoint_revert(checkpoint);
        assert!(journal.load_account(A).unwrap().is_cold);
    }

    #[test]
    fn original_value_survives_intra_tx_writes() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 0)]);
        journal.load_account(A).unwrap();
        journal.sstore(A, U256::from(1), U256::from(10)).unwrap();
        let second = journal.sstore(A, U256::from(1), U256::from(20)).unwrap();
        assert_eq!(second.data.original_value, U256::ZERO);
        assert_eq!(second.data.present_value, U256::from(10));
        assert_eq!(second.data.new_value, U256::from(20));
    }

    #[test]
    fn snapshot_consumed_once() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 0)]);
        journal.load_account(A).unwrap();
        journal.set_balance(A, U256::from(100));

        let snapshot = journal.snapshot();
        journal.set_balance(A, U256::from(200));
        journal.revert_to_snapshot(snapshot).unwrap();
        assert_eq!(journal.account(A).info.balance, U256::from(100));
        assert_eq!(
            journal.revert_to_snapshot(snapshot),
            Err(SnapshotError::InvalidSnapshot(snapshot))
        );
    }

    #[test]
    fn transient_storage_reverts_and_dies_at_finalize() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 0)]);
        journal.tstore(A, U256::from(1), U256::from(5));

        let checkpoint = journal.checkpoint();
        journal.tstore(A, U256::from(1), U256::from(9));
        journal.checkpoint_revert(checkpoint);
        assert_eq!(journal.tload(A, U256::from(1)), U256::from(5));

        journal.finalize();
        assert_eq!(journal.tload(A, U256::from(1)), U256::ZERO);
    }

    #[test]
    fn selfdestruct_is_balance_transfer_only_for_old_contracts_in_cancun() {
        let mut journal = journal_with(Hardfork::Cancun, &[(A, 50), (B, 0)]);
        journal.load_account(A).unwrap();
        let result = journal.selfdestruct(A, B).unwrap();
        assert!(result.data.had_value);
        assert!(!journal.account(A).is_selfdestructed());
        assert_eq!(journal.account(B).info.balance, U256::from(50));
        assert_eq!(journal.account(A).info.balance, U256::ZERO);
    }

    #[test]
    fn selfdestruct_marks_deletion_pre_cancun() {
        let mut journal = journal_with(Hardfork::London, &[(A, 50), (B, 0)]);
        journal.load_account(A).unwrap();
        journal.selfdestruct(A, B).unwrap();
        assert!(journal.account(A).is_selfdestructed());
    }

    #[test]
    fn finalize_drops_untouched_and_empty_accounts() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 10)]);
        // Loaded but untouched.
        journal.load_account(A).unwrap();
        // Touched but empty (EIP-161).
        journal.load_account(B).unwrap();
        journal.touch(B);
        let output = journal.finalize();
        assert!(output.state.is_empty());
    }

    #[test]
    fn create_collision_reverts_cleanly() {
        let mut journal = journal_with(Hardfork::Latest, &[(A, 100)]);
        journal.load_account(A).unwrap();
        journal.load_account(B).unwrap();
        journal.set_nonce(B, 1);
        let before = journal.journal_len();

        let err = journal
            .create_account_checkpoint(A, B, U256::from(10))
            .unwrap_err();
        assert_eq!(err, TransferError::CreateCollision);
        assert_eq!(journal.depth(), 0);
        assert_eq!(journal.journal_len(), before);
        assert_eq!(journal.account(A).info.balance, U256::from(100));
    }
}
