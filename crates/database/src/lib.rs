//! State database interface and implementations.
//!
//! [`Database`] is the read side the journal drives; [`DatabaseCommit`] is
//! the write side a driver applies finalized state to. [`CacheDb`] layers a
//! mutable overlay over any [`DatabaseRef`]; [`fork`] resolves misses from a
//! remote chain through a synchronous request pump.

pub mod fork;

mod cache_db;
mod empty_db;

pub use cache_db::{CacheDb, DbAccount, InMemoryDb};
pub use empty_db::EmptyDb;
pub use fork::{
    BlockTag, CachePolicy, ForkDb, ForkDbError, ForkRequest, RequestKind, FORK_RETRY_BUDGET,
};

use auto_impl::auto_impl;
use core::error::Error;
use primitives::{Address, HashMap, B256, U256};
use state::{Account, AccountInfo, Bytecode};

/// State reads used during execution.
#[auto_impl(&mut, Box)]
pub trait Database {
    /// Error the backing store can surface.
    type Error: Error;

    /// Basic account information, `None` for unknown accounts.
    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;

    /// Account code by its hash. The code store is content-addressed and
    /// immutable, so this is shared across transactions.
    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error>;

    /// Value of a storage slot; absent keys read as zero.
    fn storage(&mut self, address: Address, slot: U256) -> Result<U256, Self::Error>;

    /// Hash of the block with the given number.
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
}

/// Applying finalized transaction state.
#[auto_impl(&mut, Box)]
pub trait DatabaseCommit {
    /// Commits the touched account set produced by a finalized journal.
    fn commit(&mut self, changes: HashMap<Address, Account>);
}

/// Read-only view of a state database.
///
/// Same contract as [`Database`] with `&self` receivers; wrap with
/// [`WrapDatabaseRef`] where a [`Database`] is expected.
#[auto_impl(&, &mut, Box, Rc, Arc)]
pub trait DatabaseRef {
    /// Error the backing store can surface.
    type Error: Error;

    /// Basic account information, `None` for unknown accounts.
    fn basic_ref(&self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;

    /// Account code by its hash.
    fn code_by_hash_ref(&self, code_hash: B256) -> Result<Bytecode, Self::Error>;

    /// Value of a storage slot; absent keys read as zero.
    fn storage_ref(&self, address: Address, slot: U256) -> Result<U256, Self::Error>;

    /// Hash of the block with the given number.
    fn block_hash_ref(&self, number: u64) -> Result<B256, Self::Error>;
}

/// Adapter providing [`Database`] for any [`DatabaseRef`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapDatabaseRef<T: DatabaseRef>(pub T);

impl<T: DatabaseRef> From<T> for WrapDatabaseRef<T> {
    fn from(db: T) -> Self {
        Self(db)
    }
}

impl<T: DatabaseRef> Database for WrapDatabaseRef<T> {
    type Error = T::Error;

    #[inline]
    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        self.0.basic_ref(address)
    }

    #[inline]
    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        self.0.code_by_hash_ref(code_hash)
    }

    #[inline]
    fn storage(&mut self, address: Address, slot: U256) -> Result<U256, Self::Error> {
        self.0.storage_ref(address, slot)
    }

    #[inline]
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        self.0.block_hash_ref(number)
    }
}
