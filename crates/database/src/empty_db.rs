//! A database with nothing in it.

use crate::{Database, DatabaseRef};
use core::convert::Infallible;
use primitives::{keccak256, Address, B256, U256};
use state::{AccountInfo, Bytecode};

/// Infallible empty state: every account is unknown, every slot zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyDb;

impl Database for EmptyDb {
    type Error = Infallible;

    #[inline]
    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        self.basic_ref(address)
    }

    #[inline]
    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        self.code_by_hash_ref(code_hash)
    }

    #[inline]
    fn storage(&mut self, address: Address, slot: U256) -> Result<U256, Self::Error> {
        self.storage_ref(address, slot)
    }

    #[inline]
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        self.block_hash_ref(number)
    }
}

impl DatabaseRef for EmptyDb {
    type Error = Infallible;

    #[inline]
    fn basic_ref(&self, _address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        Ok(None)
    }

    #[inline]
    fn code_by_hash_ref(&self, _code_hash: B256) -> Result<Bytecode, Self::Error> {
        Ok(Bytecode::default())
    }

    #[inline]
    fn storage_ref(&self, _address: Address, _slot: U256) -> Result<U256, Self::Error> {
        Ok(U256::ZERO)
    }

    /// Deterministic placeholder so BLOCKHASH stays total without a chain.
    #[inline]
    fn block_hash_ref(&self, number: u64) -> Result<B256, Self::Error> {
        Ok(keccak256(number.to_be_bytes()))
    }
}
