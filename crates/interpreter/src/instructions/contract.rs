//! The CALL and CREATE families.
//!
//! Handlers price the operation, compute the EIP-150 forwardable gas and
//! hand a fully-formed input to the host, which owns checkpoints, depth and
//! the recursion into a fresh frame.

use crate::{
    gas,
    host::Host,
    inputs::{
        CallInputs, CallOutcome, CallScheme, CallValue, CreateInputs, CreateOutcome, CreateScheme,
    },
    instruction_result::InstructionResult,
    interpreter::Interpreter,
    return_ok, return_revert,
};
use primitives::{Address, Bytes, Hardfork, B256, MAX_INITCODE_SIZE, U256};

#[inline]
fn pop_address(word: U256) -> Address {
    Address::from_word(B256::from(word))
}

/// Copies the callee's result into the caller: return-data buffer, gas
/// accounting, output memory range and the success word.
fn insert_call_outcome(
    interpreter: &mut Interpreter,
    outcome: CallOutcome,
    out_offset: usize,
    out_len: usize,
) {
    let result = outcome.result;
    interpreter.return_data = result.output.clone();

    let success = match result.result {
        return_ok!() => {
            interpreter.gas.erase_cost(result.gas.remaining());
            interpreter.gas.record_refund(result.gas.refunded());
            true
        }
        return_revert!() => {
            interpreter.gas.erase_cost(result.gas.remaining());
            false
        }
        // Error-class: the forwarded gas is gone.
        _ => false,
    };

    let copy_len = usize::min(out_len, result.output.len());
    if copy_len != 0 {
        interpreter.memory.set(out_offset, &result.output[..copy_len]);
    }
    push!(interpreter, U256::from(success));
}

/// Copies the constructor's result into the caller. `RETURNDATA` is only
/// populated when the constructor reverted.
fn insert_create_outcome(interpreter: &mut Interpreter, outcome: CreateOutcome) {
    let result = outcome.result;
    interpreter.return_data = if result.result.is_revert() {
        result.output.clone()
    } else {
        Bytes::new()
    };

    match result.result {
        return_ok!() => {
            interpreter.gas.erase_cost(result.gas.remaining());
            interpreter.gas.record_refund(result.gas.refunded());
            let address = outcome.address.unwrap_or_default();
            push!(interpreter, address.into_word().into());
        }
        return_revert!() => {
            interpreter.gas.erase_cost(result.gas.remaining());
            push!(interpreter, U256::ZERO);
        }
        _ => {
            push!(interpreter, U256::ZERO);
        }
    }
}

pub fn call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!(
        [local_gas, to, value, in_offset, in_len, out_offset, out_len],
        interpreter
    );
    let to = pop_address(to);
    let has_transfer = !value.is_zero();
    if interpreter.is_static && has_transfer {
        interpreter.halt(InstructionResult::WriteProtection);
        return;
    }

    let in_len = as_usize_or_fail!(interpreter, in_len);
    let input = if in_len != 0 {
        let in_offset = as_usize_or_fail!(interpreter, in_offset);
        resize_memory!(interpreter, in_offset, in_len);
        Bytes::copy_from_slice(interpreter.memory.slice(in_offset, in_len))
    } else {
        Bytes::new()
    };
    let out_len = as_usize_or_fail!(interpreter, out_len);
    let out_offset = if out_len != 0 {
        let out_offset = as_usize_or_fail!(interpreter, out_offset);
        resize_memory!(interpreter, out_offset, out_len);
        out_offset
    } else {
        0
    };

    let Some(load) = host.load_account_delegated(to) else {
        interpreter.halt_state_unavailable();
        return;
    };
    let spec = interpreter.spec;
    gas!(
        interpreter,
        gas::call_cost(spec, has_transfer, load.is_cold, load.data.is_empty)
    );
    if let Some(delegate) = load.data.delegate {
        gas!(interpreter, gas::warm_cold_cost(delegate.is_cold));
    }

    // EIP-150: forward at most 63/64 of what is left.
    let local_gas = as_u64_saturated!(local_gas);
    let mut gas_limit = if spec.is_enabled_in(Hardfork::Tangerine) {
        u64::min(local_gas, interpreter.gas.remaining_63_of_64_parts())
    } else {
        local_gas
    };
    gas!(interpreter, gas_limit);
    if has_transfer {
        // The stipend is granted to the callee, not charged to the caller.
        gas_limit += gas::CALL_STIPEND;
    }

    let outcome = host.call(CallInputs {
        input,
        gas_limit,
        bytecode_address: to,
        target_address: to,
        caller: interpreter.input.target_address,
        value: CallValue::Transfer(value),
        scheme: CallScheme::Call,
        is_static: interpreter.is_static,
    });
    insert_call_outcome(interpreter, outcome, out_offset, out_len);
}

pub fn call_code<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    popn!(
        [local_gas, to, value, in_offset, in_len, out_offset, out_len],
        interpreter
    );
    let to = pop_address(to);
    let has_transfer = !value.is_zero();

    let in_len = as_usize_or_fail!(interpreter, in_len);
    let input = if in_len != 0 {
        let in_offset = as_usize_or_fail!(interpreter, in_offset);
        resize_memory!(interpreter, in_offset, in_len);
        Bytes::copy_from_slice(interpreter.memory.slice(in_offset, in_len))
    } else {
        Bytes::new()
    };
    let out_len = as_usize_or_fail!(interpreter, out_len);
    let out_offset = if out_len != 0 {
        let out_offset = as_usize_or_fail!(interpreter, out_offset);
        resize_memory!(interpreter, out_offset, out_len);
        out_offset
    } else {
        0
    };

    let Some(load) = host.load_account_delegated(to) else {
        interpreter.halt_state_unavailable();
        return;
    };
    let spec = interpreter.spec;
    // Value moves to the executing account itself, never creating one.
    gas!(
        interpreter,
        gas::call_cost(spec, has_transfer, load.is_cold, false)
    );
    if let Some(delegate) = load.data.delegate {
        gas!(interpreter, gas::warm_cold_cost(delegate.is_cold));
    }

    let local_gas = as_u64_saturated!(local_gas);
    let mut gas_limit = if spec.is_enabled_in(Hardfork::Tangerine) {
        u64::min(local_gas, interpreter.gas.remaining_63_of_64_parts())
    } else {
        local_gas
    };
    gas!(interpreter, gas_limit);
    if has_transfer {
        gas_limit += gas::CALL_STIPEND;
    }

    let outcome = host.call(CallInputs {
        input,
        gas_limit,
        bytecode_address: to,
        target_address: interpreter.input.target_address,
        caller: interpreter.input.target_address,
        value: CallValue::Transfer(value),
        scheme: CallScheme::CallCode,
        is_static: interpreter.is_static,
    });
    insert_call_outcome(interpreter, outcome, out_offset, out_len);
}

/// EIP-7: DELEGATECALL. Runs foreign code with the caller's storage,
/// identity and value.
pub fn delegate_call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Homestead);
    popn!(
        [local_gas, to, in_offset, in_len, out_offset, out_len],
        interpreter
    );
    let to = pop_address(to);

    let in_len = as_usize_or_fail!(interpreter, in_len);
    let input = if in_len != 0 {
        let in_offset = as_usize_or_fail!(interpreter, in_offset);
        resize_memory!(interpreter, in_offset, in_len);
        Bytes::copy_from_slice(interpreter.memory.slice(in_offset, in_len))
    } else {
        Bytes::new()
    };
    let out_len = as_usize_or_fail!(interpreter, out_len);
    let out_offset = if out_len != 0 {
        let out_offset = as_usize_or_fail!(interpreter, out_offset);
        resize_memory!(interpreter, out_offset, out_len);
        out_offset
    } else {
        0
    };

    let Some(load) = host.load_account_delegated(to) else {
        interpreter.halt_state_unavailable();
        return;
    };
    let spec = interpreter.spec;
    gas!(interpreter, gas::call_cost(spec, false, load.is_cold, false));
    if let Some(delegate) = load.data.delegate {
        gas!(interpreter, gas::warm_cold_cost(delegate.is_cold));
    }

    let local_gas = as_u64_saturated!(local_gas);
    let gas_limit = if spec.is_enabled_in(Hardfork::Tangerine) {
        u64::min(local_gas, interpreter.gas.remaining_63_of_64_parts())
    } else {
        local_gas
    };
    gas!(interpreter, gas_limit);

    let outcome = host.call(CallInputs {
        input,
        gas_limit,
        bytecode_address: to,
        target_address: interpreter.input.target_address,
        caller: interpreter.input.caller_address,
        value: CallValue::Apparent(interpreter.input.call_value),
        scheme: CallScheme::DelegateCall,
        is_static: interpreter.is_static,
    });
    insert_call_outcome(interpreter, outcome, out_offset, out_len);
}

/// EIP-214: STATICCALL.
pub fn static_call<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Byzantium);
    popn!(
        [local_gas, to, in_offset, in_len, out_offset, out_len],
        interpreter
    );
    let to = pop_address(to);

    let in_len = as_usize_or_fail!(interpreter, in_len);
    let input = if in_len != 0 {
        let in_offset = as_usize_or_fail!(interpreter, in_offset);
        resize_memory!(interpreter, in_offset, in_len);
        Bytes::copy_from_slice(interpreter.memory.slice(in_offset, in_len))
    } else {
        Bytes::new()
    };
    let out_len = as_usize_or_fail!(interpreter, out_len);
    let out_offset = if out_len != 0 {
        let out_offset = as_usize_or_fail!(interpreter, out_offset);
        resize_memory!(interpreter, out_offset, out_len);
        out_offset
    } else {
        0
    };

    let Some(load) = host.load_account_delegated(to) else {
        interpreter.halt_state_unavailable();
        return;
    };
    let spec = interpreter.spec;
    gas!(interpreter, gas::call_cost(spec, false, load.is_cold, false));
    if let Some(delegate) = load.data.delegate {
        gas!(interpreter, gas::warm_cold_cost(delegate.is_cold));
    }

    let local_gas = as_u64_saturated!(local_gas);
    let gas_limit = u64::min(local_gas, interpreter.gas.remaining_63_of_64_parts());
    gas!(interpreter, gas_limit);

    let outcome = host.call(CallInputs {
        input,
        gas_limit,
        bytecode_address: to,
        target_address: to,
        caller: interpreter.input.target_address,
        value: CallValue::Transfer(U256::ZERO),
        scheme: CallScheme::StaticCall,
        is_static: true,
    });
    insert_call_outcome(interpreter, outcome, out_offset, out_len);
}

/// CREATE and, with `IS_CREATE2`, EIP-1014 CREATE2.
pub fn create<const IS_CREATE2: bool, H: Host + ?Sized>(
    interpreter: &mut Interpreter,
    host: &mut H,
) {
    require_non_staticcall!(interpreter);
    let scheme;
    let (value, code_offset, len) = if IS_CREATE2 {
        check!(interpreter, Hardfork::Constantinople);
        popn!([value, code_offset, len, salt], interpreter);
        scheme = CreateScheme::Create2 { salt };
        (value, code_offset, len)
    } else {
        popn!([value, code_offset, len], interpreter);
        scheme = CreateScheme::Create;
        (value, code_offset, len)
    };

    let len = as_usize_or_fail!(interpreter, len);
    let mut init_code = Bytes::new();
    if len != 0 {
        // EIP-3860: cap and meter initcode.
        if interpreter.spec.is_enabled_in(Hardfork::Shanghai) {
            if len > MAX_INITCODE_SIZE {
                interpreter.halt(InstructionResult::CreateInitCodeSizeLimit);
                return;
            }
            gas!(interpreter, gas::initcode_cost(len as u64));
        }
        let code_offset = as_usize_or_fail!(interpreter, code_offset);
        resize_memory!(interpreter, code_offset, len);
        init_code = Bytes::copy_from_slice(interpreter.memory.slice(code_offset, len));
    }

    if IS_CREATE2 {
        gas_or_fail!(interpreter, gas::create2_cost(len as u64));
    } else {
        gas!(interpreter, gas::CREATE);
    }

    let mut gas_limit = interpreter.gas.remaining();
    if interpreter.spec.is_enabled_in(Hardfork::Tangerine) {
        // EIP-150 keeps one 64th with the caller.
        gas_limit -= gas_limit / 64;
    }
    gas!(interpreter, gas_limit);

    let outcome = host.create(CreateInputs {
        caller: interpreter.input.target_address,
        scheme,
        value,
        init_code,
        gas_limit,
    });
    insert_create_outcome(interpreter, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gas::Gas, host::DummyHost, inputs::FrameInput, instruction_table,
        instruction_result::InterpreterResult, interpreter::Interpreter,
    };
    use bytecode::AnalyzedBytecode;

    /// Host that records the call inputs it receives and answers with a
    /// canned outcome.
    #[derive(Default)]
    struct RecordingHost {
        inner: DummyHost,
        calls: Vec<CallInputs>,
        outcome_result: Option<InstructionResult>,
        outcome_output: Bytes,
    }

    impl Host for RecordingHost {
        fn env(&self) -> &primitives::Env {
            self.inner.env()
        }
        fn load_account_delegated(
            &mut self,
            address: Address,
        ) -> Option<crate::host::StateLoad<crate::host::AccountLoad>> {
            self.inner.load_account_delegated(address)
        }
        fn balance(&mut self, address: Address) -> Option<crate::host::StateLoad<U256>> {
            self.inner.balance(address)
        }
        fn code(&mut self, address: Address) -> Option<crate::host::StateLoad<Bytes>> {
            self.inner.code(address)
        }
        fn code_hash(&mut self, address: Address) -> Option<crate::host::StateLoad<B256>> {
            self.inner.code_hash(address)
        }
        fn sload(&mut self, address: Address, key: U256) -> Option<crate::host::StateLoad<U256>> {
            self.inner.sload(address, key)
        }
        fn sstore(
            &mut self,
            address: Address,
            key: U256,
            value: U256,
        ) -> Option<crate::host::StateLoad<crate::host::SStoreResult>> {
            self.inner.sstore(address, key, value)
        }
        fn tload(&mut self, address: Address, key: U256) -> U256 {
            self.inner.tload(address, key)
        }
        fn tstore(&mut self, address: Address, key: U256, value: U256) {
            self.inner.tstore(address, key, value)
        }
        fn log(&mut self, log: primitives::Log) {
            self.inner.log(log)
        }
        fn selfdestruct(
            &mut self,
            address: Address,
            target: Address,
        ) -> Option<crate::host::StateLoad<crate::host::SelfDestructResult>> {
            self.inner.selfdestruct(address, target)
        }
        fn block_hash(&mut self, number: u64) -> Option<B256> {
            self.inner.block_hash(number)
        }
        fn call(&mut self, inputs: CallInputs) -> CallOutcome {
            let gas = Gas::new(inputs.gas_limit);
            self.calls.push(inputs);
            CallOutcome::new(InterpreterResult::new(
                self.outcome_result.unwrap_or(InstructionResult::Stop),
                self.outcome_output.clone(),
                gas,
            ))
        }
        fn create(&mut self, inputs: CreateInputs) -> CreateOutcome {
            CreateOutcome::new(
                InterpreterResult::new(
                    InstructionResult::Stop,
                    Bytes::new(),
                    Gas::new(inputs.gas_limit),
                ),
                Some(Address::with_last_byte(0x42)),
            )
        }
    }

    fn run_call_code(code: &[u8], host: &mut RecordingHost, gas_limit: u64) -> Interpreter {
        let mut interpreter = Interpreter::new(
            AnalyzedBytecode::new(code),
            FrameInput::default(),
            false,
            Hardfork::Latest,
            gas_limit,
        );
        let table = instruction_table::<RecordingHost>();
        interpreter.run(&table, host);
        interpreter
    }

    #[test]
    fn call_forwards_at_most_63_of_64() {
        // PUSH1 0 x5 (ret/out/in ranges, value); PUSH1 0xEE (to);
        // PUSH32 max (gas); CALL; STOP
        let mut code = vec![
            0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0xEE,
        ];
        code.push(0x7F);
        code.extend_from_slice(&[0xFF; 32]);
        code.push(0xF1);
        code.push(0x00);

        let mut host = RecordingHost::default();
        let interpreter = run_call_code(&code, &mut host, 100_000);
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        assert_eq!(host.calls.len(), 1);

        // 6 pushes * 3 + push32 * 3 + warm account access 100.
        let spent_before_forward = 7 * 3 + 100;
        let available = 100_000 - spent_before_forward;
        assert_eq!(host.calls[0].gas_limit, available - available / 64);
        // Success pushes 1.
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::from(1));
    }

    #[test]
    fn call_with_value_in_static_context_fails() {
        // PUSH1 0 x4; PUSH1 1 (value); PUSH1 0xEE; PUSH1 0xFF (gas); CALL
        let code = vec![
            0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x01, 0x60, 0xEE, 0x60, 0xFF,
            0xF1, 0x00,
        ];
        let mut host = RecordingHost::default();
        let mut interpreter = Interpreter::new(
            AnalyzedBytecode::new(&code),
            FrameInput::default(),
            true,
            Hardfork::Latest,
            100_000,
        );
        let table = instruction_table::<RecordingHost>();
        interpreter.run(&table, &mut host);
        assert_eq!(
            interpreter.instruction_result,
            InstructionResult::WriteProtection
        );
        assert!(host.calls.is_empty());
    }

    #[test]
    fn reverted_call_returns_gas_and_pushes_zero() {
        let mut host = RecordingHost {
            outcome_result: Some(InstructionResult::Revert),
            outcome_output: Bytes::from_static(b"why"),
            ..Default::default()
        };
        // PUSH1 0 x5; PUSH1 0xEE; PUSH2 0x1000 (gas); CALL; STOP
        let code = vec![
            0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0xEE, 0x61, 0x10,
            0x00, 0xF1, 0x00,
        ];
        let interpreter = run_call_code(&code, &mut host, 100_000);
        assert_eq!(interpreter.stack.peek(0).unwrap(), U256::ZERO);
        // Revert output lands in the return-data buffer.
        assert_eq!(interpreter.return_data.as_ref(), b"why");
        // All forwarded gas came back: only static costs were spent.
        let spent = 6 * 3 + 3 + 100;
        assert_eq!(interpreter.gas.spent(), spent);
    }

    #[test]
    fn create_pushes_new_address() {
        // PUSH1 0 (len); PUSH1 0 (offset); PUSH1 0 (value); CREATE; STOP
        let code = vec![0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0xF0, 0x00];
        let mut host = RecordingHost::default();
        let interpreter = run_call_code(&code, &mut host, 100_000);
        assert_eq!(interpreter.instruction_result, InstructionResult::Stop);
        assert_eq!(
            interpreter.stack.peek(0).unwrap(),
            U256::from_be_bytes(Address::with_last_byte(0x42).into_word().0)
        );
    }
}
