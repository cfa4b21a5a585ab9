//! One-pass bytecode analysis: jump-destination discovery and STOP padding.

use crate::{jump_table::JumpTable, opcode};
use bitvec::{bitvec, order::Lsb0};
use primitives::Bytes;

/// Scans `code` once, marking every `JUMPDEST` that lies outside a `PUSH`
/// immediate window, and pads the code so that execution always ends on a
/// `STOP`.
///
/// Skipping immediate windows closes the classic attack where a `0x5B` byte
/// inside push data is offered as a jump target. The padding guarantees that
/// a `PUSH` whose immediate is cut off by the end of code still has bytes to
/// read (they read as zeroes, per the yellow paper) and that the byte after
/// the last instruction is a terminator.
pub fn analyze_code(code: &[u8]) -> (JumpTable, Bytes) {
    if code.is_empty() {
        return (JumpTable::default(), Bytes::from_static(&[opcode::STOP]));
    }

    let mut jumps = bitvec![u8, Lsb0; 0; code.len()];
    let mut i = 0;
    let mut last_opcode = 0;
    while i < code.len() {
        let op = code[i];
        last_opcode = op;
        if op == opcode::JUMPDEST {
            jumps.set(i, true);
            i += 1;
        } else {
            let push_offset = op.wrapping_sub(opcode::PUSH1);
            if push_offset < 32 {
                i += push_offset as usize + 2;
            } else {
                i += 1;
            }
        }
    }

    // `i` overshoots the buffer by the number of immediate bytes the final
    // (truncated) PUSH still expects; one extra byte forces a trailing STOP.
    let padding = (i - code.len()) + usize::from(last_opcode != opcode::STOP);
    let bytes = if padding > 0 {
        let mut padded = Vec::with_capacity(code.len() + padding);
        padded.extend_from_slice(code);
        padded.resize(code.len() + padding, 0);
        Bytes::from(padded)
    } else {
        Bytes::copy_from_slice(code)
    };

    (JumpTable::new(jumps), bytes)
}

/// Bytecode paired with the result of its analysis pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyzedBytecode {
    /// STOP-padded code executed by the interpreter.
    bytes: Bytes,
    /// Length of the code before padding; `CODESIZE`, `CODECOPY` and the
    /// code hash all refer to this prefix.
    original_len: usize,
    /// Valid jump destinations.
    jump_table: JumpTable,
}

impl AnalyzedBytecode {
    /// Analyzes `code` and takes ownership of the padded form.
    pub fn new(code: &[u8]) -> Self {
        let (jump_table, bytes) = analyze_code(code);
        Self {
            bytes,
            original_len: code.len(),
            jump_table,
        }
    }

    /// Padded code, always at least one byte and ending in `STOP`.
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The code as deployed, without analysis padding.
    #[inline]
    pub fn original_bytes(&self) -> Bytes {
        self.bytes.slice(..self.original_len)
    }

    /// Length of the unpadded code.
    #[inline]
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Opcode byte at `pc`. Callers stay in bounds because terminators halt
    /// the frame before `pc` can run past the padding.
    #[inline]
    pub fn opcode(&self, pc: usize) -> u8 {
        self.bytes[pc]
    }

    /// Whether `pc` is a valid `JUMP`/`JUMPI` destination.
    #[inline]
    pub fn is_valid_jump(&self, pc: usize) -> bool {
        self.jump_table.is_valid(pc)
    }

    /// The analysis bitmap.
    #[inline]
    pub fn jump_table(&self) -> &JumpTable {
        &self.jump_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;

    #[test]
    fn empty_code_becomes_single_stop() {
        let analyzed = AnalyzedBytecode::new(&[]);
        assert_eq!(analyzed.bytes().as_ref(), &[opcode::STOP]);
        assert_eq!(analyzed.original_len(), 0);
        assert!(analyzed.original_bytes().is_empty());
    }

    #[test]
    fn code_ending_in_stop_is_not_padded() {
        let code = [opcode::PUSH1, 0x01, opcode::PUSH1, 0x02, opcode::ADD, opcode::STOP];
        let (_, padded) = analyze_code(&code);
        assert_eq!(padded.len(), code.len());
    }

    #[test]
    fn truncated_push_pads_to_full_immediate_plus_stop() {
        // PUSH16 with no immediate: 16 missing bytes + trailing STOP.
        let code = [opcode::PUSH1, 0x01, opcode::PUSH16];
        let (_, padded) = analyze_code(&code);
        assert_eq!(padded.len(), code.len() + 17);
        assert_eq!(padded[padded.len() - 1], opcode::STOP);
    }

    #[test]
    fn jumpdest_inside_push_data_is_not_valid() {
        // PUSH1 0x5B; the 0x5B at offset 1 is immediate data.
        let code = [opcode::PUSH1, opcode::JUMPDEST, opcode::JUMPDEST, opcode::STOP];
        let (table, _) = analyze_code(&code);
        assert!(!table.is_valid(1));
        assert!(table.is_valid(2));
    }

    #[test]
    fn push_windows_never_contain_valid_destinations() {
        // For every PUSHn at offset p, no destination in [p+1, p+n].
        let mut code = vec![opcode::PUSH32];
        code.extend_from_slice(&[opcode::JUMPDEST; 32]);
        code.push(opcode::JUMPDEST);
        code.push(opcode::STOP);
        let (table, _) = analyze_code(&code);
        for pc in 1..=32 {
            assert!(!table.is_valid(pc), "pc {pc} is push data");
        }
        assert!(table.is_valid(33));
    }

    #[test]
    fn jumpdest_at_offset_zero() {
        let code = [opcode::JUMPDEST, opcode::STOP];
        let (table, _) = analyze_code(&code);
        assert!(table.is_valid(0));
    }
}
