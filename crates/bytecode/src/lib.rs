//! EVM bytecode: the opcode table, jump-destination analysis and the
//! straight-line block disassembler used by the tracer.

pub mod analysis;
pub mod blocks;
pub mod eip7702;
pub mod jump_table;
pub mod opcode;

mod bytecode;

pub use analysis::{analyze_code, AnalyzedBytecode};
pub use blocks::{analyze_blocks, disassemble, Block, Instruction};
pub use bytecode::Bytecode;
pub use eip7702::{Eip7702Bytecode, Eip7702DecodeError, EIP7702_MAGIC_BYTES};
pub use jump_table::JumpTable;
pub use opcode::OpCode;
