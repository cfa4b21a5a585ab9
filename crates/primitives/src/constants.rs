//! Protocol-level constants.

use alloy_primitives::{b256, B256};

/// Keccak-256 hash of the empty byte string.
pub const KECCAK_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Interpreter stack limit, in words.
pub const STACK_LIMIT: usize = 1024;

/// Maximum call/create depth.
pub const CALL_STACK_LIMIT: usize = 1024;

/// EIP-170: maximum size of deployed contract code, in bytes.
pub const MAX_CODE_SIZE: usize = 0x6000;

/// EIP-3860: maximum size of initcode, in bytes.
pub const MAX_INITCODE_SIZE: usize = 2 * MAX_CODE_SIZE;

/// EIP-4844: target blob gas per block.
pub const TARGET_BLOB_GAS_PER_BLOCK: u64 = 393_216;

/// EIP-4844: minimum price of one unit of blob gas.
pub const MIN_BLOB_GASPRICE: u64 = 1;

/// EIP-4844: denominator of the blob base fee update fraction.
pub const BLOB_GASPRICE_UPDATE_FRACTION: u64 = 3_338_477;

/// EIP-4844: blob versioned hash version byte.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;
