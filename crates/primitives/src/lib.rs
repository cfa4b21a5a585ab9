//! Primitive types shared by every scopevm crate.
//!
//! The 256-bit word, address and hash types come from [`alloy_primitives`];
//! this crate adds the EVM-facing vocabulary on top: the [`Hardfork`]
//! timeline, protocol constants, the execution [`Env`] and contract address
//! derivation.

pub mod address;
pub mod constants;
pub mod env;
pub mod hardfork;

pub use address::{create2_address, create_address};
pub use constants::*;
pub use env::{BlobExcessGasAndPrice, BlockEnv, CfgEnv, Env, TransactTo, TxEnv};
pub use hardfork::Hardfork;

// Re-export the alloy vocabulary under one roof so downstream crates only
// need to depend on `primitives`.
pub use alloy_primitives::{
    self, address, b256, bytes, fixed_bytes, hex, keccak256, uint, Address, Bytes, FixedBytes,
    Log, LogData, B256, I256, U256,
};

/// Hash maps keyed by pre-hashed data (addresses, hashes) throughout the
/// workspace.
pub use alloy_primitives::map::{hash_map, hash_set, HashMap, HashSet};
