//! Frame-context opcodes: hashing, identities, calldata, code and
//! return-data buffers.

use crate::{gas, host::Host, instruction_result::InstructionResult, interpreter::Interpreter};
use primitives::{keccak256, Hardfork, KECCAK_EMPTY, U256};

pub fn keccak256_op<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([offset], top, interpreter);
    let len = as_usize_or_fail!(interpreter, top);
    gas_or_fail!(interpreter, gas::keccak256_cost(len as u64));
    let hash = if len == 0 {
        KECCAK_EMPTY
    } else {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        keccak256(interpreter.memory.slice(offset, len))
    };
    *top = hash.into();
}

pub fn address<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(
        interpreter,
        interpreter.input.target_address.into_word().into()
    );
}

pub fn caller<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(
        interpreter,
        interpreter.input.caller_address.into_word().into()
    );
}

pub fn callvalue<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, interpreter.input.call_value);
}

pub fn calldataload<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([], top, interpreter);
    let input = &interpreter.input.input;
    let mut word = [0u8; 32];
    // Reads past the calldata end load zeroes.
    if let Ok(offset) = usize::try_from(*top) {
        if offset < input.len() {
            let count = usize::min(32, input.len() - offset);
            word[..count].copy_from_slice(&input[offset..offset + count]);
        }
    }
    *top = U256::from_be_bytes(word);
}

pub fn calldatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.input.input.len()));
}

pub fn calldatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, data_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let data_offset = usize::try_from(data_offset).unwrap_or(usize::MAX);
    resize_memory!(interpreter, memory_offset, len);
    let input = interpreter.input.input.clone();
    interpreter
        .memory
        .set_data(memory_offset, data_offset, len, &input);
}

pub fn codesize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.bytecode.original_len()));
}

pub fn codecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn!([memory_offset, code_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = usize::try_from(code_offset).unwrap_or(usize::MAX);
    resize_memory!(interpreter, memory_offset, len);
    let code = interpreter.bytecode.original_bytes();
    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, &code);
}

/// EIP-211: RETURNDATASIZE.
pub fn returndatasize<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Byzantium);
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.return_data.len()));
}

/// EIP-211: RETURNDATACOPY. Unlike the other copies, reading past the end
/// of the buffer is an error, not zero-fill.
pub fn returndatacopy<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Byzantium);
    popn!([memory_offset, data_offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::verylowcopy_cost(len as u64));

    let data_offset = usize::try_from(data_offset).unwrap_or(usize::MAX);
    let data_end = data_offset.saturating_add(len);
    if data_end > interpreter.return_data.len() {
        interpreter.halt(InstructionResult::OutOfBounds);
        return;
    }
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    resize_memory!(interpreter, memory_offset, len);
    let data = interpreter.return_data.clone();
    interpreter
        .memory
        .set_data(memory_offset, data_offset, len, &data);
}

pub fn gas<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(interpreter.gas.remaining()));
}

#[cfg(test)]
mod tests {
    use crate::{
        host::DummyHost, inputs::FrameInput, instruction_table, interpreter::Interpreter,
        InstructionResult,
    };
    use bytecode::AnalyzedBytecode;
    use primitives::{Bytes, Hardfork, U256};

    fn run_with_input(code: &[u8], input: Bytes) -> Interpreter {
        let mut host = DummyHost::default();
        let mut interpreter = Interpreter::new(
            AnalyzedBytecode::new(code),
            FrameInput {
                input,
                ..Default::default()
            },
            false,
            Hardfork::Latest,
            1_000_000,
        );
        let table = instruction_table::<DummyHost>();
        interpreter.run(&table, &mut host);
        interpreter
    }

    #[test]
    fn keccak_of_empty_is_the_known_constant() {
        // PUSH1 0; PUSH1 0; KECCAK256; STOP
        let code = vec![0x60, 0x00, 0x60, 0x00, 0x20, 0x00];
        let interpreter = run_with_input(&code, Bytes::new());
        assert_eq!(
            interpreter.stack.peek(0).unwrap(),
            U256::from_be_bytes(primitives::KECCAK_EMPTY.0)
        );
    }

    #[test]
    fn calldataload_zero_pads_past_end() {
        // PUSH1 2; CALLDATALOAD; STOP with 4-byte calldata.
        let code = vec![0x60, 0x02, 0x35, 0x00];
        let interpreter = run_with_input(&code, Bytes::from_static(&[0xAA, 0xBB, 0xCC, 0xDD]));
        let expected = {
            let mut word = [0u8; 32];
            word[0] = 0xCC;
            word[1] = 0xDD;
            U256::from_be_bytes(word)
        };
        assert_eq!(interpreter.stack.peek(0).unwrap(), expected);
    }

    #[test]
    fn returndatacopy_out_of_bounds_errors() {
        // PUSH1 1; PUSH1 0; PUSH1 0; RETURNDATACOPY with empty return data.
        let code = vec![0x60, 0x01, 0x60, 0x00, 0x60, 0x00, 0x3E, 0x00];
        let interpreter = run_with_input(&code, Bytes::new());
        assert_eq!(
            interpreter.instruction_result,
            InstructionResult::OutOfBounds
        );
    }

    #[test]
    fn codecopy_zero_fills_past_code_end() {
        // PUSH1 32; PUSH1 0; PUSH1 0; CODECOPY; MSIZE; STOP
        let code = vec![0x60, 0x20, 0x60, 0x00, 0x60, 0x00, 0x39, 0x59, 0x00];
        let interpreter = run_with_input(&code, Bytes::new());
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        // The 9 code bytes land in memory, the tail is zero.
        assert_eq!(interpreter.memory.slice(0, 2), &code[..2]);
        assert_eq!(interpreter.memory.slice(9, 23), &[0u8; 23]);
    }
}
