//! Stack manipulation: POP, PUSH0..32, DUP1..16, SWAP1..16.

use crate::{gas, host::Host, interpreter::Interpreter};
use primitives::{Hardfork, U256};

pub fn pop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    popn!([_value], interpreter);
}

/// EIP-3855: PUSH0.
pub fn push0<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Shanghai);
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::ZERO);
}

/// `PUSHn`: reads `N` immediate bytes into a zero-extended word and skips
/// them. Analysis padding guarantees the immediate window exists even when
/// the deployed code was cut short.
pub fn push<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    let start = interpreter.pc;
    let slice = &interpreter.bytecode.bytes()[start..start + N];
    if !interpreter.stack.push_slice(slice) {
        interpreter.halt_overflow();
        return;
    }
    interpreter.pc += N;
}

/// `DUPn` (1-based from the top).
pub fn dup<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    if !interpreter.stack.dup(N) {
        // Either nothing at depth N or the stack is full.
        if interpreter.stack.len() < N {
            interpreter.halt_underflow();
        } else {
            interpreter.halt_overflow();
        }
    }
}

/// `SWAPn`: exchanges the top with the word `N` below it.
pub fn swap<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    if !interpreter.stack.exchange(N) {
        interpreter.halt_underflow();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        host::DummyHost, inputs::FrameInput, instruction_table, interpreter::Interpreter,
        InstructionResult,
    };
    use bytecode::AnalyzedBytecode;
    use primitives::{Hardfork, U256};

    fn run_code_at(code: &[u8], spec: Hardfork) -> Interpreter {
        let mut host = DummyHost::default();
        let mut interpreter = Interpreter::new(
            AnalyzedBytecode::new(code),
            FrameInput::default(),
            false,
            spec,
            1_000_000,
        );
        let table = instruction_table::<DummyHost>();
        interpreter.run(&table, &mut host);
        interpreter
    }

    #[test]
    fn push32_and_swap() {
        // PUSH32 1..32; PUSH1 0xAA; SWAP1; POP; STOP
        let mut code = vec![0x7F];
        code.extend_from_slice(&core::array::from_fn::<u8, 32, _>(|i| i as u8 + 1));
        code.extend_from_slice(&[0x60, 0xAA, 0x90, 0x50, 0x00]);
        let interpreter = run_code_at(&code, Hardfork::Latest);
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::from(0xAA));
    }

    #[test]
    fn truncated_push_reads_zero_padding() {
        // PUSH2 with a single immediate byte: 0x12 then padded zero.
        let code = vec![0x61, 0x12];
        let interpreter = run_code_at(&code, Hardfork::Latest);
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::from(0x1200));
    }

    #[test]
    fn push0_is_shanghai_gated() {
        let code = vec![0x5F, 0x00];
        let interpreter = run_code_at(&code, Hardfork::Merge);
        assert_eq!(
            interpreter.instruction_result,
            InstructionResult::InvalidOpcode
        );
        let interpreter = run_code_at(&code, Hardfork::Shanghai);
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::ZERO);
    }

    #[test]
    fn dup_depth_errors() {
        // DUP1 on an empty stack underflows.
        let code = vec![0x80, 0x00];
        let interpreter = run_code_at(&code, Hardfork::Latest);
        assert_eq!(
            interpreter.instruction_result,
            InstructionResult::StackUnderflow
        );
    }
}
