//! The precompile dispatch surface.
//!
//! Precompiles are addresses in a reserved low range whose behavior is a
//! pure function of `(input, gas_limit)`. The set is the extension point;
//! the core ships none and dispatches to whatever the embedder registers.

use primitives::{Address, Bytes, HashMap};

/// A precompile body: `(input, gas_limit)` to output and gas used.
pub type PrecompileFn = fn(&[u8], u64) -> PrecompileResult;

/// What a precompile produced.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileError>;

/// Successful precompile execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Gas consumed; the caller verifies it fits the forwarded gas.
    pub gas_used: u64,
    /// Returned bytes.
    pub output: Bytes,
}

/// Why a precompile failed. Failures consume all forwarded gas.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrecompileError {
    /// The body determined its cost exceeds the forwarded gas.
    #[error("precompile ran out of gas")]
    OutOfGas,
    /// Malformed input.
    #[error("invalid precompile input: {0}")]
    InvalidInput(String),
}

/// Registered precompiles, keyed by address.
#[derive(Clone, Debug, Default)]
pub struct Precompiles {
    inner: HashMap<Address, PrecompileFn>,
}

impl Precompiles {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a handler at `address`, replacing any previous one.
    pub fn insert(&mut self, address: Address, precompile: PrecompileFn) {
        self.inner.insert(address, precompile);
    }

    /// Handler registered at `address`, if any.
    pub fn get(&self, address: &Address) -> Option<PrecompileFn> {
        self.inner.get(address).copied()
    }

    /// Whether `address` hosts a precompile.
    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    /// All registered addresses.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.inner.keys()
    }

    /// Number of registered precompiles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
