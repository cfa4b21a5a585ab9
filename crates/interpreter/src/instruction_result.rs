//! Frame halt reasons.

use crate::gas::Gas;
use journal::TransferError;
use primitives::Bytes;

/// How an instruction left the frame.
///
/// `Continue` keeps the frame running; everything else is terminal and
/// sticky. The discriminant ranges group the variants so the predicate
/// macros stay cheap.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstructionResult {
    /// Not halted.
    #[default]
    Continue = 0,
    /// STOP, or execution ran off the end of (padded) code.
    Stop,
    /// RETURN with an output buffer.
    Return,
    /// SELFDESTRUCT.
    SelfDestruct,

    /// REVERT: state rolled back, unused gas returned, output kept.
    Revert = 0x10,
    /// CALL/CREATE would exceed depth 1024; no frame was entered.
    CallDepthExceeded,
    /// Caller cannot pay the transferred value; no frame was entered.
    OutOfFunds,

    /// Gas exhausted.
    OutOfGas = 0x50,
    /// Memory expansion beyond addressable range.
    MemoryOverflow,
    /// An opcode popped more than the stack held.
    StackUnderflow,
    /// A push grew the stack beyond 1024 words.
    StackOverflow,
    /// JUMP/JUMPI to a destination outside the jumpdest table.
    InvalidJump,
    /// A PUSH immediate runs past the end of code (disassembly only; the
    /// interpreter executes the zero-padded form).
    InvalidPush,
    /// A read beyond an operand buffer (RETURNDATACOPY past the end of
    /// return data).
    OutOfBounds,
    /// Undefined opcode, INVALID, or an opcode not active in this
    /// hardfork.
    InvalidOpcode,
    /// State-mutating opcode inside a static call.
    WriteProtection,
    /// CREATE target already occupied.
    CreateCollision,
    /// Created code exceeds the EIP-170 cap.
    CreateContractSizeLimit,
    /// Created code starts with 0xEF (EIP-3541).
    CreateContractStartingWithEF,
    /// Initcode exceeds the EIP-3860 cap.
    CreateInitCodeSizeLimit,
    /// Nonce cannot be incremented further.
    NonceOverflow,
    /// A registered precompile rejected its input.
    PrecompileError,
    /// The state backend could not answer; fatal for the transaction.
    StateUnavailable,
}

impl From<TransferError> for InstructionResult {
    fn from(error: TransferError) -> Self {
        match error {
            TransferError::OutOfFunds => Self::OutOfFunds,
            TransferError::OverflowPayment => Self::OutOfFunds,
            TransferError::CreateCollision => Self::CreateCollision,
        }
    }
}

/// Matches every successful terminator.
#[macro_export]
macro_rules! return_ok {
    () => {
        $crate::InstructionResult::Stop
            | $crate::InstructionResult::Return
            | $crate::InstructionResult::SelfDestruct
    };
}

/// Matches the revert class: state undone, remaining gas returned.
#[macro_export]
macro_rules! return_revert {
    () => {
        $crate::InstructionResult::Revert
            | $crate::InstructionResult::CallDepthExceeded
            | $crate::InstructionResult::OutOfFunds
    };
}

impl InstructionResult {
    /// Successful terminator.
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, return_ok!())
    }

    /// Revert-class halt: unused gas goes back to the caller.
    #[inline]
    pub const fn is_revert(self) -> bool {
        matches!(self, return_revert!())
    }

    /// Error-class halt: all forwarded gas is consumed.
    #[inline]
    pub const fn is_error(self) -> bool {
        self as u8 >= Self::OutOfGas as u8
    }

    /// The frame is still running.
    #[inline]
    pub const fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Result of a finished frame: halt reason, output buffer and gas state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpreterResult {
    /// Why the frame halted.
    pub result: InstructionResult,
    /// RETURN/REVERT buffer, empty otherwise.
    pub output: Bytes,
    /// Gas counter at halt.
    pub gas: Gas,
}

impl InterpreterResult {
    /// Bundles a finished frame.
    pub const fn new(result: InstructionResult, output: Bytes, gas: Gas) -> Self {
        Self {
            result,
            output,
            gas,
        }
    }

    /// Successful terminator.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Revert-class halt.
    #[inline]
    pub const fn is_revert(&self) -> bool {
        self.result.is_revert()
    }

    /// Error-class halt.
    #[inline]
    pub const fn is_error(&self) -> bool {
        self.result.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_disjoint() {
        use InstructionResult::*;
        for result in [Stop, Return, SelfDestruct] {
            assert!(result.is_ok() && !result.is_revert() && !result.is_error());
        }
        for result in [Revert, CallDepthExceeded, OutOfFunds] {
            assert!(result.is_revert() && !result.is_ok() && !result.is_error());
        }
        for result in [
            OutOfGas,
            StackUnderflow,
            StackOverflow,
            InvalidJump,
            InvalidOpcode,
            WriteProtection,
            StateUnavailable,
        ] {
            assert!(result.is_error() && !result.is_ok() && !result.is_revert());
        }
        assert!(Continue.is_continue());
    }
}
