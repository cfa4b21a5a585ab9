//! In-memory overlay database.

use crate::{Database, DatabaseCommit, DatabaseRef, EmptyDb};
use primitives::{hash_map::Entry, Address, HashMap, B256, KECCAK_EMPTY, U256};
use state::{Account, AccountInfo, Bytecode};

/// Fully in-memory state, the default store for tests and local execution.
pub type InMemoryDb = CacheDb<EmptyDb>;

/// A mutable account/storage/code overlay on top of a read-only fallback.
///
/// Reads fill the overlay from the fallback; commits only ever touch the
/// overlay. Code is stored content-addressed by Keccak hash, shared across
/// accounts and never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheDb<ExtDb> {
    /// Accounts known to the overlay.
    pub accounts: HashMap<Address, DbAccount>,
    /// Code blobs keyed by hash.
    pub contracts: HashMap<B256, Bytecode>,
    /// Hashes of past blocks, filled on demand.
    pub block_hashes: HashMap<u64, B256>,
    /// Fallback consulted on overlay misses.
    pub db: ExtDb,
}

/// Overlay entry for one account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbAccount {
    /// Balance, nonce and code hash.
    pub info: AccountInfo,
    /// Known storage slots. Deleted accounts keep an empty map so their
    /// old slots read as zero instead of hitting the fallback.
    pub storage: HashMap<U256, U256>,
    /// Set when the account was removed (EIP-161 cleanup, SELFDESTRUCT).
    pub deleted: bool,
}

impl DbAccount {
    fn new(info: AccountInfo) -> Self {
        Self {
            info,
            storage: HashMap::default(),
            deleted: false,
        }
    }
}

impl<ExtDb> CacheDb<ExtDb> {
    /// Creates an empty overlay over `db`.
    pub fn new(db: ExtDb) -> Self {
        Self {
            accounts: HashMap::default(),
            contracts: HashMap::default(),
            block_hashes: HashMap::default(),
            db,
        }
    }

    /// Inserts account info, replacing what the overlay knew.
    pub fn insert_account_info(&mut self, address: Address, mut info: AccountInfo) {
        if let Some(code) = info.code.take() {
            if !code.is_empty() {
                info.code_hash = code.hash_slow();
                self.contracts.entry(info.code_hash).or_insert(code);
            }
        }
        if info.code_hash.is_zero() {
            info.code_hash = KECCAK_EMPTY;
        }
        self.accounts.insert(address, DbAccount::new(info));
    }

    /// Inserts one storage slot, creating the account if needed.
    pub fn insert_account_storage(&mut self, address: Address, slot: U256, value: U256) {
        self.accounts.entry(address).or_default().storage.insert(slot, value);
    }

    /// Stores a code blob under its hash and returns the hash.
    pub fn insert_contract(&mut self, code: Bytecode) -> B256 {
        let hash = code.hash_slow();
        if hash != KECCAK_EMPTY {
            self.contracts.entry(hash).or_insert(code);
        }
        hash
    }
}

impl<ExtDb: DatabaseRef> Database for CacheDb<ExtDb> {
    type Error = ExtDb::Error;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        let account = match self.accounts.entry(address) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => match self.db.basic_ref(address)? {
                Some(info) => entry.insert(DbAccount::new(info)),
                None => entry.insert(DbAccount {
                    deleted: true,
                    ..Default::default()
                }),
            },
        };
        if account.deleted {
            return Ok(None);
        }
        Ok(Some(account.info.clone()))
    }

    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        match self.contracts.entry(code_hash) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let code = self.db.code_by_hash_ref(code_hash)?;
                entry.insert(code.clone());
                Ok(code)
            }
        }
    }

    fn storage(&mut self, address: Address, slot: U256) -> Result<U256, Self::Error> {
        let Some(account) = self.accounts.get_mut(&address) else {
            // Unknown account: resolve the slot straight from the fallback.
            return self.db.storage_ref(address, slot);
        };
        if account.deleted {
            return Ok(U256::ZERO);
        }
        match account.storage.entry(slot) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let value = self.db.storage_ref(address, slot)?;
                entry.insert(value);
                Ok(value)
            }
        }
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        match self.block_hashes.entry(number) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let hash = self.db.block_hash_ref(number)?;
                entry.insert(hash);
                Ok(hash)
            }
        }
    }
}

impl<ExtDb> DatabaseCommit for CacheDb<ExtDb> {
    fn commit(&mut self, changes: HashMap<Address, Account>) {
        for (address, account) in changes {
            if !account.is_touched() {
                continue;
            }
            if account.is_selfdestructed() {
                let entry = self.accounts.entry(address).or_default();
                entry.info = AccountInfo::default();
                entry.storage = HashMap::default();
                entry.deleted = true;
                continue;
            }
            let mut info = account.info;
            if let Some(code) = info.code.take() {
                if !code.is_empty() {
                    self.contracts.entry(info.code_hash).or_insert(code);
                }
            }
            let entry = self.accounts.entry(address).or_default();
            entry.deleted = false;
            entry.info = info;
            entry
                .storage
                .extend(account.storage.into_iter().map(|(k, v)| (k, v.present_value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;
    use state::StorageSlot;

    #[test]
    fn overlay_round_trip() {
        let mut db = InMemoryDb::default();
        let addr = address!("0000000000000000000000000000000000000010");
        db.insert_account_info(addr, AccountInfo::from_balance(U256::from(100)));
        db.insert_account_storage(addr, U256::from(1), U256::from(42));

        assert_eq!(db.basic(addr).unwrap().unwrap().balance, U256::from(100));
        assert_eq!(db.storage(addr, U256::from(1)).unwrap(), U256::from(42));
        assert_eq!(db.storage(addr, U256::from(2)).unwrap(), U256::ZERO);
        assert!(db.basic(Address::ZERO).unwrap().is_none());
    }

    #[test]
    fn contracts_are_content_addressed() {
        let mut db = InMemoryDb::default();
        let code = Bytecode::new_raw([0x60, 0x00, 0x00].as_slice().into());
        let hash = db.insert_contract(code.clone());
        assert_eq!(hash, code.hash_slow());
        assert_eq!(db.code_by_hash(hash).unwrap(), code);
    }

    #[test]
    fn commit_applies_touched_accounts_only() {
        let mut db = InMemoryDb::default();
        let touched = address!("0000000000000000000000000000000000000001");
        let ignored = address!("0000000000000000000000000000000000000002");

        let mut changes: HashMap<Address, Account> = HashMap::default();
        let mut account = Account::from(AccountInfo::from_balance(U256::from(7)));
        account.mark_touch();
        account
            .storage
            .insert(U256::from(3), StorageSlot::new_changed(U256::ZERO, U256::from(9)));
        changes.insert(touched, account);
        changes.insert(ignored, Account::from(AccountInfo::from_balance(U256::from(1))));

        db.commit(changes);
        assert_eq!(db.basic(touched).unwrap().unwrap().balance, U256::from(7));
        assert_eq!(db.storage(touched, U256::from(3)).unwrap(), U256::from(9));
        assert!(db.basic(ignored).unwrap().is_none());
    }

    #[test]
    fn selfdestructed_account_reads_as_absent_and_zeroed() {
        let mut db = InMemoryDb::default();
        let addr = address!("00000000000000000000000000000000000000aa");
        db.insert_account_info(addr, AccountInfo::from_balance(U256::from(5)));
        db.insert_account_storage(addr, U256::from(1), U256::from(2));

        let mut changes: HashMap<Address, Account> = HashMap::default();
        let mut account = Account::from(AccountInfo::default());
        account.mark_touch();
        account.mark_selfdestruct();
        changes.insert(addr, account);
        db.commit(changes);

        assert!(db.basic(addr).unwrap().is_none());
        assert_eq!(db.storage(addr, U256::from(1)).unwrap(), U256::ZERO);
    }
}
