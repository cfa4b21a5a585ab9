//! Linear disassembly and straight-line block analysis.
//!
//! A block is a run of instructions with a single entry: it begins at
//! `pc = 0` or at a `JUMPDEST`, and ends before the next `JUMPDEST` or after
//! any of `JUMP`, `JUMPI`, `STOP`, `RETURN`, `REVERT`, `INVALID`,
//! `SELFDESTRUCT`. Each block aggregates the hardfork-independent base gas
//! of its instructions, which lets a tracer display (or a dispatcher debit)
//! straight-line gas in one step.

use crate::opcode::{self, OpCode, OPCODE_INFO};
use primitives::{hex, Bytes};

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    /// Byte offset of the opcode.
    pub pc: u32,
    /// The opcode byte; may be an undefined opcode.
    pub opcode: u8,
    /// Immediate bytes for `PUSHn`, in code order.
    pub push_data: Option<Bytes>,
    /// Set when a `PUSH` immediate runs past the end of code. The
    /// interpreter zero-extends such immediates; disassembly keeps the
    /// truncated bytes and flags them.
    pub is_truncated: bool,
}

impl Instruction {
    /// Canonical mnemonic, `"UNKNOWN"` for undefined bytes.
    pub fn name(&self) -> &'static str {
        OpCode::name_by_op(self.opcode)
    }

    /// The opcode, when the byte is defined.
    pub fn op(&self) -> Option<OpCode> {
        OpCode::new(self.opcode)
    }

    /// Hex rendering of opcode plus immediate, e.g. `"6005"` for `PUSH1 05`.
    pub fn hex(&self) -> String {
        let mut out = hex::encode([self.opcode]);
        if let Some(data) = &self.push_data {
            out.push_str(&hex::encode(data));
        }
        out
    }
}

/// A straight-line instruction sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// Byte offset of the first instruction.
    pub begin_pc: u32,
    /// Instructions in code order.
    pub instructions: Vec<Instruction>,
    /// Sum of the base gas of every instruction in the block. Dynamic
    /// charges (memory expansion, access lists, SSTORE transitions) are
    /// not included.
    pub static_gas: u64,
}

/// Decodes `code` into a flat instruction listing.
///
/// `PUSHn` captures the following `n` bytes and the cursor advances by
/// `1 + n`; everything else advances by one. Undefined bytes decode as
/// single instructions so the listing covers the whole input.
pub fn disassemble(code: &[u8]) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pc = 0usize;
    while pc < code.len() {
        let op = code[pc];
        let immediate = OpCode::new(op).map_or(0, |op| op.immediate_size() as usize);
        let (push_data, is_truncated) = if immediate > 0 {
            let start = pc + 1;
            let end = usize::min(start + immediate, code.len());
            (
                Some(Bytes::copy_from_slice(&code[start..end])),
                end - start < immediate,
            )
        } else {
            (None, false)
        };
        instructions.push(Instruction {
            pc: pc as u32,
            opcode: op,
            push_data,
            is_truncated,
        });
        pc += 1 + immediate;
    }
    instructions
}

/// Disassembles `code` and groups the instructions into blocks.
pub fn analyze_blocks(code: &[u8]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for instruction in disassemble(code) {
        // A JUMPDEST opens a fresh block even mid-stream.
        if instruction.opcode == opcode::JUMPDEST {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
        }
        let block = current.get_or_insert_with(|| Block {
            begin_pc: instruction.pc,
            instructions: Vec::new(),
            static_gas: 0,
        });
        block.static_gas += OPCODE_INFO[instruction.opcode as usize]
            .map_or(0, |info| info.base_gas as u64);
        let ends_block = matches!(instruction.opcode, opcode::JUMP | opcode::JUMPI)
            || instruction.op().is_some_and(|op| op.is_terminating());
        block.instructions.push(instruction);
        if ends_block {
            blocks.push(current.take().unwrap());
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disassembles_push_immediates() {
        // PUSH1 05; PUSH1 0A; ADD; PUSH1 03; MUL; STOP
        let code = hex::decode("6005600a01600302").unwrap();
        let listing = disassemble(&code);
        let names: Vec<_> = listing.iter().map(|i| i.name()).collect();
        assert_eq!(names, ["PUSH1", "PUSH1", "ADD", "PUSH1", "MUL", "STOP"]);
        assert_eq!(listing[0].hex(), "6005");
        assert_eq!(
            listing[0].push_data.as_ref().map(|b| b.as_ref()),
            Some(&[0x05][..])
        );
        assert_eq!(listing[4].pc, 7);
        assert!(listing.iter().all(|i| !i.is_truncated));
    }

    #[test]
    fn truncated_push_is_flagged() {
        let code = [opcode::PUSH4, 0xAA, 0xBB];
        let listing = disassemble(&code);
        assert_eq!(listing.len(), 1);
        assert!(listing[0].is_truncated);
        assert_eq!(
            listing[0].push_data.as_ref().map(|b| b.as_ref()),
            Some(&[0xAA, 0xBB][..])
        );
    }

    #[test]
    fn blocks_split_on_jumpdest_and_terminators() {
        // PUSH1 03; JUMP; JUMPDEST; PUSH1 00; STOP; JUMPDEST; STOP
        let code = [
            opcode::PUSH1,
            0x03,
            opcode::JUMP,
            opcode::JUMPDEST,
            opcode::PUSH1,
            0x00,
            opcode::STOP,
            opcode::JUMPDEST,
            opcode::STOP,
        ];
        let blocks = analyze_blocks(&code);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].begin_pc, 0);
        assert_eq!(blocks[0].instructions.len(), 2);
        assert_eq!(blocks[1].begin_pc, 3);
        assert_eq!(blocks[1].instructions.len(), 3);
        assert_eq!(blocks[2].begin_pc, 7);
    }

    #[test]
    fn block_static_gas_aggregates_base_costs() {
        // PUSH1 (3) + PUSH1 (3) + ADD (3) + STOP (0) = 9
        let code = [opcode::PUSH1, 0x01, opcode::PUSH1, 0x02, opcode::ADD, opcode::STOP];
        let blocks = analyze_blocks(&code);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].static_gas, 9);
    }

    #[test]
    fn jumpdest_counts_its_own_gas() {
        let code = [opcode::JUMPDEST, opcode::PUSH1, 0x00, opcode::POP, opcode::STOP];
        let blocks = analyze_blocks(&code);
        assert_eq!(blocks.len(), 1);
        // JUMPDEST (1) + PUSH1 (3) + POP (2)
        assert_eq!(blocks[0].static_gas, 6);
    }
}
