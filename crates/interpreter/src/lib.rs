//! The frame interpreter: a single call frame executing hardfork-gated
//! opcodes over a 1024-word stack and 32-byte-aligned memory, with exact
//! gas metering.
//!
//! Dispatch is a dense 256-entry table of handler functions. The host side
//! of every state-touching opcode goes through the [`Host`] trait; `CALL`
//! and `CREATE` recurse into the host, which owns checkpoints and depth.

#[macro_use]
pub mod instructions;

pub mod gas;
pub mod host;
pub mod interpreter;

mod inputs;
mod instruction_result;

pub use gas::Gas;
pub use host::{DummyHost, Host};
pub use inputs::{
    CallInputs, CallOutcome, CallScheme, CallValue, CreateInputs, CreateOutcome, CreateScheme,
    FrameInput,
};
pub use instruction_result::{InstructionResult, InterpreterResult};
pub use instructions::{instruction_table, Instruction, InstructionTable};
pub use interpreter::{
    resize_memory, Interpreter, Memory, Stack, CALL_STACK_LIMIT, STACK_LIMIT,
};
