//! The frame: program counter, stack, memory, gas and halt state.

mod memory;
mod stack;

pub use memory::Memory;
pub use stack::{Stack, STACK_LIMIT};

/// Frames deeper than this cannot CALL or CREATE.
pub use primitives::CALL_STACK_LIMIT;

use crate::{
    gas::{Gas, MemoryExtensionResult},
    host::Host,
    inputs::FrameInput,
    instruction_result::{InstructionResult, InterpreterResult},
    instructions::InstructionTable,
};
use bytecode::AnalyzedBytecode;
use primitives::{Bytes, Hardfork};

/// One call frame.
///
/// Created at call entry, mutated only by its own [`step`](Self::step),
/// destroyed at a terminator. Once `instruction_result` leaves
/// [`InstructionResult::Continue`] the frame is halted and further steps
/// are no-ops.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interpreter {
    /// Analyzed, STOP-padded code.
    pub bytecode: AnalyzedBytecode,
    /// Index of the next opcode in `bytecode`.
    pub pc: usize,
    /// Gas counter.
    pub gas: Gas,
    /// Word stack.
    pub stack: Stack,
    /// Byte memory.
    pub memory: Memory,
    /// Output of the most recent nested call.
    pub return_data: Bytes,
    /// Immutable frame context.
    pub input: FrameInput,
    /// Mutations are forbidden when set.
    pub is_static: bool,
    /// Active hardfork, fixed at frame creation.
    pub spec: Hardfork,
    /// Halt state; `Continue` while running.
    pub instruction_result: InstructionResult,
    /// RETURN/REVERT buffer.
    pub output: Bytes,
}

impl Interpreter {
    /// Builds a frame ready to run `bytecode`.
    pub fn new(
        bytecode: AnalyzedBytecode,
        input: FrameInput,
        is_static: bool,
        spec: Hardfork,
        gas_limit: u64,
    ) -> Self {
        Self {
            bytecode,
            pc: 0,
            gas: Gas::new(gas_limit),
            stack: Stack::new(),
            memory: Memory::new(),
            return_data: Bytes::new(),
            input,
            is_static,
            spec,
            instruction_result: InstructionResult::Continue,
            output: Bytes::new(),
        }
    }

    /// Returns `true` while the frame can keep stepping.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.instruction_result.is_continue()
    }

    /// Halts the frame. The first halt wins; later ones are ignored so a
    /// terminal state is never overwritten.
    #[cold]
    pub fn halt(&mut self, result: InstructionResult) {
        if self.instruction_result.is_continue() {
            self.instruction_result = result;
        }
    }

    /// Halts with `OutOfGas`, consuming whatever was left.
    #[cold]
    pub fn halt_oog(&mut self) {
        self.gas.spend_all();
        self.halt(InstructionResult::OutOfGas);
    }

    /// Halts with `StackUnderflow`.
    #[cold]
    pub fn halt_underflow(&mut self) {
        self.halt(InstructionResult::StackUnderflow);
    }

    /// Halts with `StackOverflow`.
    #[cold]
    pub fn halt_overflow(&mut self) {
        self.halt(InstructionResult::StackOverflow);
    }

    /// Halts with `StateUnavailable`; the host could not answer a read.
    #[cold]
    pub fn halt_state_unavailable(&mut self) {
        self.halt(InstructionResult::StateUnavailable);
    }

    /// Executes the opcode at `pc`.
    ///
    /// The counter is advanced before dispatch; PUSH handlers advance it
    /// further, JUMP handlers overwrite it. Analysis guarantees the padded
    /// code ends in STOP, so `pc` cannot run off the buffer while the
    /// frame is live.
    #[inline]
    pub fn step<H: Host + ?Sized>(&mut self, table: &InstructionTable<H>, host: &mut H) {
        // Terminal states are sticky; stepping a halted frame is a no-op.
        if !self.is_running() {
            return;
        }
        let opcode = self.bytecode.opcode(self.pc);
        self.pc += 1;
        (table[opcode as usize])(self, host);
    }

    /// Runs the frame to its terminator and returns the result.
    pub fn run<H: Host + ?Sized>(
        &mut self,
        table: &InstructionTable<H>,
        host: &mut H,
    ) -> InterpreterResult {
        while self.is_running() {
            host.step(self);
            self.step(table, host);
            host.step_end(self);
        }
        self.take_result()
    }

    /// Extracts the frame's result after it halted.
    pub fn take_result(&mut self) -> InterpreterResult {
        InterpreterResult::new(
            self.instruction_result,
            core::mem::take(&mut self.output),
            self.gas,
        )
    }
}

/// Charges memory expansion for `[offset, offset + len)` and grows the
/// buffer to the new 32-byte-aligned size.
#[inline]
#[must_use = "the caller must halt the frame on error"]
pub fn resize_memory(
    gas: &mut Gas,
    memory: &mut Memory,
    offset: usize,
    len: usize,
) -> Result<(), InstructionResult> {
    if len == 0 {
        return Ok(());
    }
    let Some(end) = offset.checked_add(len) else {
        return Err(InstructionResult::MemoryOverflow);
    };
    let words = end.div_ceil(32);
    match gas.record_memory_expansion(words) {
        MemoryExtensionResult::Extended => {
            memory.resize(words * 32);
            Ok(())
        }
        MemoryExtensionResult::Same => Ok(()),
        MemoryExtensionResult::OutOfGas => Err(InstructionResult::OutOfGas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_size_stays_word_aligned() {
        let mut gas = Gas::new(1_000_000);
        let mut memory = Memory::new();
        resize_memory(&mut gas, &mut memory, 0, 1).unwrap();
        assert_eq!(memory.len(), 32);
        resize_memory(&mut gas, &mut memory, 33, 1).unwrap();
        assert_eq!(memory.len(), 64);
        // Already covered: no growth, no charge.
        let remaining = gas.remaining();
        resize_memory(&mut gas, &mut memory, 0, 64).unwrap();
        assert_eq!(gas.remaining(), remaining);
    }

    #[test]
    fn oversized_expansion_is_out_of_gas() {
        let mut gas = Gas::new(100);
        let mut memory = Memory::new();
        let err = resize_memory(&mut gas, &mut memory, 0, 1 << 30).unwrap_err();
        assert_eq!(err, InstructionResult::OutOfGas);
        assert_eq!(memory.len(), 0);
    }

    #[test]
    fn offset_overflow_is_memory_overflow() {
        let mut gas = Gas::new(u64::MAX);
        let mut memory = Memory::new();
        let err = resize_memory(&mut gas, &mut memory, usize::MAX, 2).unwrap_err();
        assert_eq!(err, InstructionResult::MemoryOverflow);
    }
}
