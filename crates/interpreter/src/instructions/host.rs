//! Opcodes that reach through the [`Host`] into state.

use crate::{
    gas,
    host::Host,
    instruction_result::InstructionResult,
    interpreter::Interpreter,
};
use primitives::{Address, Bytes, Hardfork, Log, LogData, B256, U256};

#[inline]
fn pop_address(word: U256) -> Address {
    Address::from_word(B256::from(word))
}

pub fn balance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let address = pop_address(*top);
    let Some(balance) = host.balance(address) else {
        interpreter.halt_state_unavailable();
        return;
    };
    gas!(
        interpreter,
        gas::balance_cost(interpreter.spec, balance.is_cold)
    );
    *top = balance.data;
}

/// EIP-1884: SELFBALANCE.
pub fn selfbalance<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Istanbul);
    gas!(interpreter, gas::LOW);
    let Some(balance) = host.balance(interpreter.input.target_address) else {
        interpreter.halt_state_unavailable();
        return;
    };
    push!(interpreter, balance.data);
}

pub fn extcodesize<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let address = pop_address(*top);
    let Some(code) = host.code(address) else {
        interpreter.halt_state_unavailable();
        return;
    };
    gas!(
        interpreter,
        gas::account_access_cost(interpreter.spec, code.is_cold)
    );
    *top = U256::from(code.data.len());
}

/// EIP-1052: EXTCODEHASH.
pub fn extcodehash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Constantinople);
    popn_top!([], top, interpreter);
    let address = pop_address(*top);
    let Some(code_hash) = host.code_hash(address) else {
        interpreter.halt_state_unavailable();
        return;
    };
    gas!(
        interpreter,
        gas::account_access_cost(interpreter.spec, code_hash.is_cold)
    );
    *top = U256::from_be_bytes(code_hash.data.0);
}

pub fn extcodecopy<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!([address, memory_offset, code_offset, len], interpreter);
    let address = pop_address(address);
    let Some(code) = host.code(address) else {
        interpreter.halt_state_unavailable();
        return;
    };

    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(
        interpreter,
        gas::extcodecopy_cost(interpreter.spec, len as u64, code.is_cold)
    );
    if len == 0 {
        return;
    }
    let memory_offset = as_usize_or_fail!(interpreter, memory_offset);
    let code_offset = usize::try_from(code_offset).unwrap_or(usize::MAX);
    resize_memory!(interpreter, memory_offset, len);
    interpreter
        .memory
        .set_data(memory_offset, code_offset, len, &code.data);
}

pub fn blockhash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BLOCKHASH);
    popn_top!([], top, interpreter);
    let requested = as_u64_saturated!(top);
    let block_number = as_u64_saturated!(host.env().block.number);

    // Only the 256 most recent blocks are addressable.
    let Some(diff) = block_number.checked_sub(requested) else {
        *top = U256::ZERO;
        return;
    };
    if diff == 0 || diff > 256 {
        *top = U256::ZERO;
        return;
    }
    let Some(hash) = host.block_hash(requested) else {
        interpreter.halt_state_unavailable();
        return;
    };
    *top = U256::from_be_bytes(hash.0);
}

pub fn sload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn_top!([], top, interpreter);
    let Some(value) = host.sload(interpreter.input.target_address, *top) else {
        interpreter.halt_state_unavailable();
        return;
    };
    gas!(interpreter, gas::sload_cost(interpreter.spec, value.is_cold));
    *top = value.data;
}

pub fn sstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);
    popn!([key, value], interpreter);
    let Some(result) = host.sstore(interpreter.input.target_address, key, value) else {
        interpreter.halt_state_unavailable();
        return;
    };
    let spec = interpreter.spec;
    gas_or_fail!(
        interpreter,
        gas::sstore_cost(
            spec,
            result.data.original_value,
            result.data.present_value,
            result.data.new_value,
            interpreter.gas.remaining(),
            result.is_cold,
        )
    );
    interpreter.gas.record_refund(gas::sstore_refund(
        spec,
        result.data.original_value,
        result.data.present_value,
        result.data.new_value,
    ));
}

/// EIP-1153: TLOAD.
pub fn tload<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Cancun);
    gas!(interpreter, gas::WARM_STORAGE_READ_COST);
    popn_top!([], top, interpreter);
    *top = host.tload(interpreter.input.target_address, *top);
}

/// EIP-1153: TSTORE.
pub fn tstore<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Cancun);
    require_non_staticcall!(interpreter);
    gas!(interpreter, gas::WARM_STORAGE_READ_COST);
    popn!([key, value], interpreter);
    host.tstore(interpreter.input.target_address, key, value);
}

/// `LOGn`.
pub fn log<const N: usize, H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);
    popn!([offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    gas_or_fail!(interpreter, gas::log_cost(N as u8, len as u64));
    let data = if len == 0 {
        Bytes::new()
    } else {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        Bytes::copy_from_slice(interpreter.memory.slice(offset, len))
    };
    let Some(topics) = interpreter.stack.popn::<N>() else {
        interpreter.halt_underflow();
        return;
    };
    let topics = topics.into_iter().map(B256::from).collect();

    host.log(Log {
        address: interpreter.input.target_address,
        data: LogData::new_unchecked(topics, data),
    });
}

pub fn selfdestruct<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    require_non_staticcall!(interpreter);
    popn!([target], interpreter);
    let target = pop_address(target);

    let Some(result) = host.selfdestruct(interpreter.input.target_address, target) else {
        interpreter.halt_state_unavailable();
        return;
    };
    // EIP-3529 removed the refund.
    if !interpreter.spec.is_enabled_in(Hardfork::London) && !result.data.previously_destroyed {
        interpreter.gas.record_refund(gas::SELFDESTRUCT_REFUND);
    }
    gas!(
        interpreter,
        gas::selfdestruct_cost(interpreter.spec, result.data, result.is_cold)
    );
    interpreter.halt(InstructionResult::SelfDestruct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        host::DummyHost, inputs::FrameInput, instruction_table, interpreter::Interpreter,
    };

    #[test]
    fn log_collects_topics_in_stack_order() {
        // PUSH1 t2; PUSH1 t1; PUSH1 0 (len); PUSH1 0 (offset); LOG2; STOP
        let code = vec![
            0x60, 0x02, 0x60, 0x01, 0x60, 0x00, 0x60, 0x00, 0xA2, 0x00,
        ];
        let mut host = DummyHost::default();
        let mut interpreter = Interpreter::new(
            bytecode::AnalyzedBytecode::new(&code),
            FrameInput::default(),
            false,
            Hardfork::Latest,
            1_000_000,
        );
        let table = instruction_table::<DummyHost>();
        interpreter.run(&table, &mut host);

        assert_eq!(host.logs.len(), 1);
        let topics = host.logs[0].topics();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0], B256::from(U256::from(1)));
        assert_eq!(topics[1], B256::from(U256::from(2)));
    }

    #[test]
    fn log_in_static_context_is_write_protection() {
        let code = vec![0x60, 0x00, 0x60, 0x00, 0xA0, 0x00];
        let mut host = DummyHost::default();
        let mut interpreter = Interpreter::new(
            bytecode::AnalyzedBytecode::new(&code),
            FrameInput::default(),
            true,
            Hardfork::Latest,
            1_000_000,
        );
        let table = instruction_table::<DummyHost>();
        interpreter.run(&table, &mut host);
        assert_eq!(
            interpreter.instruction_result,
            InstructionResult::WriteProtection
        );
    }
}
