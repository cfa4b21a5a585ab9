//! Inputs and outcomes of the CALL and CREATE families.

use crate::instruction_result::InterpreterResult;
use primitives::{Address, Bytes, U256};

/// Context a frame executes under.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameInput {
    /// Account whose storage and identity the frame uses (ADDRESS).
    pub target_address: Address,
    /// Immediate caller (CALLER).
    pub caller_address: Address,
    /// Calldata (CALLDATA*).
    pub input: Bytes,
    /// Apparent value (CALLVALUE).
    pub call_value: U256,
}

/// The four message-call variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallScheme {
    /// `CALL`.
    Call,
    /// `CALLCODE`: callee code, caller storage, value to self.
    CallCode,
    /// `DELEGATECALL`: callee code, caller storage, caller context.
    DelegateCall,
    /// `STATICCALL`: read-only `CALL`.
    StaticCall,
}

/// Value semantics of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallValue {
    /// Wei actually moved from caller to target.
    Transfer(U256),
    /// Value only apparent to the frame (DELEGATECALL keeps the parent's).
    Apparent(U256),
}

impl Default for CallValue {
    fn default() -> Self {
        Self::Transfer(U256::ZERO)
    }
}

impl CallValue {
    /// The value the frame observes.
    #[inline]
    pub const fn get(&self) -> U256 {
        match self {
            Self::Transfer(value) | Self::Apparent(value) => *value,
        }
    }

    /// Wei to move, zero for apparent values.
    #[inline]
    pub const fn transfer(&self) -> U256 {
        match self {
            Self::Transfer(value) => *value,
            Self::Apparent(_) => U256::ZERO,
        }
    }
}

/// One message call, handed to the host for execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallInputs {
    /// Calldata for the callee.
    pub input: Bytes,
    /// Gas made available to the callee (EIP-150 already applied).
    pub gas_limit: u64,
    /// Account whose code runs.
    pub bytecode_address: Address,
    /// Account whose storage and identity the callee uses.
    pub target_address: Address,
    /// Caller as the callee observes it.
    pub caller: Address,
    /// Value semantics.
    pub value: CallValue,
    /// Which opcode produced this call.
    pub scheme: CallScheme,
    /// Whether mutations are forbidden.
    pub is_static: bool,
}

/// The two creation variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateScheme {
    /// `CREATE`: address from caller and nonce.
    Create,
    /// `CREATE2`: address from caller, salt and initcode hash.
    Create2 {
        /// The salt word.
        salt: U256,
    },
}

/// One contract creation, handed to the host for execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateInputs {
    /// Creator account.
    pub caller: Address,
    /// Address derivation scheme.
    pub scheme: CreateScheme,
    /// Wei endowment for the new contract.
    pub value: U256,
    /// Constructor code.
    pub init_code: Bytes,
    /// Gas made available to the constructor.
    pub gas_limit: u64,
}

/// What came back from a message call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallOutcome {
    /// Halt reason, output and remaining gas of the callee.
    pub result: InterpreterResult,
}

impl CallOutcome {
    /// Wraps a finished callee frame.
    pub const fn new(result: InterpreterResult) -> Self {
        Self { result }
    }
}

/// What came back from a creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateOutcome {
    /// Halt reason, output and remaining gas of the constructor.
    pub result: InterpreterResult,
    /// Address of the created contract; set even on failure so tracers can
    /// attribute the attempt.
    pub address: Option<Address>,
}

impl CreateOutcome {
    /// Wraps a finished constructor frame.
    pub const fn new(result: InterpreterResult, address: Option<Address>) -> Self {
        Self { result, address }
    }
}
