//! Result shapes the journal hands to the interpreter.

use primitives::{Address, U256};

/// A loaded value together with its EIP-2929 warmth at access time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateLoad<T> {
    /// The loaded value.
    pub data: T,
    /// `true` when this was the first access in the transaction.
    pub is_cold: bool,
}

impl<T> StateLoad<T> {
    /// Pairs a value with its warmth.
    pub fn new(data: T, is_cold: bool) -> Self {
        Self { data, is_cold }
    }

    /// Maps the inner value, keeping the warmth.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StateLoad<U> {
        StateLoad::new(f(self.data), self.is_cold)
    }
}

/// Account facts the CALL family needs before forwarding gas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountLoad {
    /// EIP-161 emptiness, priced as "new account" when value is transferred.
    pub is_empty: bool,
    /// EIP-7702 delegate resolution target and its warmth, when the account
    /// carries a designator.
    pub delegate: Option<DelegateLoad>,
}

/// Where a delegation designator points, and what following it cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelegateLoad {
    /// The delegate whose code will run.
    pub address: Address,
    /// Warmth of the delegate account at resolution time.
    pub is_cold: bool,
}

/// `(original, present, new)` triple returned by an SSTORE, feeding the
/// EIP-2200/3529 cost and refund tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SStoreResult {
    /// Slot value at transaction start.
    pub original_value: U256,
    /// Slot value before this store.
    pub present_value: U256,
    /// Value just written.
    pub new_value: U256,
}

impl SStoreResult {
    /// `true` when the store did not change the present value.
    pub fn is_noop(&self) -> bool {
        self.present_value == self.new_value
    }
}

/// Outcome of a SELFDESTRUCT, priced by the interpreter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelfDestructResult {
    /// The destroyed contract held a balance.
    pub had_value: bool,
    /// The beneficiary existed (EIP-161 aware).
    pub target_exists: bool,
    /// The contract was already marked destroyed this transaction.
    pub previously_destroyed: bool,
}

/// Why a balance movement failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferError {
    /// Sender balance below the transferred value.
    OutOfFunds,
    /// Receiver balance would overflow.
    OverflowPayment,
    /// CREATE target already has code or a nonce.
    CreateCollision,
}
