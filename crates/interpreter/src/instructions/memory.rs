//! Memory opcodes.

use crate::{gas, host::Host, interpreter::Interpreter};
use primitives::{Hardfork, U256};

pub fn mload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([], top, interpreter);
    let offset = as_usize_or_fail!(interpreter, top);
    resize_memory!(interpreter, offset, 32);
    *top = interpreter.memory.get_u256(offset);
}

pub fn mstore<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn!([offset, value], interpreter);
    let offset = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, offset, 32);
    interpreter.memory.set_u256(offset, value);
}

pub fn mstore8<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn!([offset, value], interpreter);
    let offset = as_usize_or_fail!(interpreter, offset);
    resize_memory!(interpreter, offset, 1);
    interpreter.memory.set_byte(offset, value.byte(0));
}

pub fn msize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.memory.len()));
}

/// EIP-5656: MCOPY.
pub fn mcopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Cancun);
    popn!([dst, src, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));
    if len == 0 {
        return;
    }
    let dst = as_usize_or_fail!(interpreter, dst);
    let src = as_usize_or_fail!(interpreter, src);
    // One expansion covering both ranges.
    resize_memory!(interpreter, core::cmp::max(dst, src), len);
    interpreter.memory.copy(dst, src, len);
}

#[cfg(test)]
mod tests {
    use crate::{
        host::DummyHost, inputs::FrameInput, instruction_table, interpreter::Interpreter,
        InstructionResult,
    };
    use bytecode::AnalyzedBytecode;
    use primitives::{Hardfork, U256};

    fn run_code(code: &[u8]) -> Interpreter {
        let mut host = DummyHost::default();
        let mut interpreter = Interpreter::new(
            AnalyzedBytecode::new(code),
            FrameInput::default(),
            false,
            Hardfork::Latest,
            1_000_000,
        );
        let table = instruction_table::<DummyHost>();
        interpreter.run(&table, &mut host);
        interpreter
    }

    #[test]
    fn mstore_mload_round_trip() {
        // PUSH1 0x42; PUSH1 0x20; MSTORE; PUSH1 0x20; MLOAD; STOP
        let code = vec![0x60, 0x42, 0x60, 0x20, 0x52, 0x60, 0x20, 0x51, 0x00];
        let interpreter = run_code(&code);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::from(0x42));
        assert_eq!(interpreter.memory.len(), 64);
    }

    #[test]
    fn msize_reports_word_aligned_size() {
        // PUSH1 0; PUSH1 0x21; MSTORE8; MSIZE; STOP
        let code = vec![0x60, 0x00, 0x60, 0x21, 0x53, 0x59, 0x00];
        let interpreter = run_code(&code);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::from(64));
    }

    #[test]
    fn mcopy_moves_bytes() {
        // PUSH1 0x11; PUSH1 0; MSTORE8; PUSH1 1; PUSH1 0; PUSH1 0x20; MCOPY; STOP
        let code = vec![
            0x60, 0x11, 0x60, 0x00, 0x53, 0x60, 0x01, 0x60, 0x00, 0x60, 0x20, 0x5E, 0x00,
        ];
        let interpreter = run_code(&code);
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        assert_eq!(interpreter.memory.slice(0x20, 1), &[0x11]);
    }

    #[test]
    fn mload_reads_zeroes_after_expansion() {
        // PUSH2 0x0100; MLOAD; STOP
        let code = vec![0x61, 0x01, 0x00, 0x51, 0x00];
        let interpreter = run_code(&code);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::ZERO);
        assert_eq!(interpreter.memory.len(), 0x120);
    }
}
