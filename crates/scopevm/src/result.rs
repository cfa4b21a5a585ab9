//! Transaction outcomes and driver errors.

use interpreter::InstructionResult;
use primitives::{Address, Bytes, Log, U256};
use state::EvmState;

/// Output of a finished transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    /// Return buffer of a message call.
    Call(Bytes),
    /// Deployed code and address of a creation.
    Create(Bytes, Option<Address>),
}

impl Output {
    /// The raw bytes either way.
    pub fn data(&self) -> &Bytes {
        match self {
            Self::Call(data) | Self::Create(data, _) => data,
        }
    }

    /// Created contract address, for creation transactions that succeeded.
    pub fn created_address(&self) -> Option<Address> {
        match self {
            Self::Call(_) => None,
            Self::Create(_, address) => *address,
        }
    }
}

/// Everything a committed (or reverted) transaction produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether the root frame ended in a successful terminator.
    pub success: bool,
    /// Halt reason of the root frame.
    pub reason: InstructionResult,
    /// Output buffer (revert data when the root frame reverted).
    pub output: Output,
    /// Gas consumed, refund already deducted.
    pub gas_used: u64,
    /// Refund granted at settlement, post-cap.
    pub gas_refunded: u64,
    /// Logs of the transaction, in emission order.
    pub logs: Vec<Log>,
    /// Addresses and storage keys the transaction warmed (EIP-2929).
    pub access_list: Vec<(Address, Vec<U256>)>,
    /// Touched state, ready for [`DatabaseCommit`](database::DatabaseCommit).
    pub state: EvmState,
}

impl ExecutionResult {
    /// Created contract address for successful creation transactions.
    pub fn created_address(&self) -> Option<Address> {
        self.output.created_address()
    }
}

/// Errors that abort the transaction before or outside frame execution.
///
/// Frame-level failures (out of gas, reverts, invalid opcodes) are *not*
/// errors: they surface as `success = false` in [`ExecutionResult`]. Only
/// [`EvmError::Database`] is retryable, by pumping the fork backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvmError<DBError> {
    /// The state backend failed or needs a remote response.
    #[error("database error: {0}")]
    Database(DBError),
    /// A frame died on an unanswerable state read with no backend error
    /// recorded.
    #[error("state unavailable")]
    StateUnavailable,
    /// Merge-era block without prevrandao.
    #[error("prevrandao not set for a post-merge spec")]
    PrevrandaoNotSet,
    /// EIP-1559: priority fee above the max fee.
    #[error("priority fee is greater than max fee")]
    PriorityFeeGreaterThanMaxFee,
    /// EIP-1559: max fee below the block base fee.
    #[error("gas price is less than basefee")]
    GasPriceLessThanBasefee,
    /// Transaction gas limit above the block gas limit.
    #[error("transaction gas limit is greater than block gas limit")]
    CallerGasLimitMoreThanBlock,
    /// Intrinsic gas alone exceeds the transaction gas limit.
    #[error("intrinsic gas is greater than gas limit")]
    CallGasCostMoreThanGasLimit,
    /// EIP-3607: sender has deployed code (and no delegation designator).
    #[error("transaction sender has deployed code")]
    RejectCallerWithCode,
    /// Declared nonce does not match the sender account.
    #[error("nonce mismatch: state {state}, transaction {tx}")]
    NonceMismatch {
        /// Nonce in state.
        state: u64,
        /// Nonce declared by the transaction.
        tx: u64,
    },
    /// Sender cannot pay `gas_limit * gas_price + value`.
    #[error("lack of funds for max fee and value")]
    LackOfFundForMaxFee,
    /// Payment arithmetic overflowed 256 bits.
    #[error("overflow in gas payment calculation")]
    OverflowPayment,
    /// Sender nonce is at the maximum.
    #[error("nonce overflow")]
    NonceOverflow,
}
