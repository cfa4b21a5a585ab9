//! Control-flow opcodes and the terminators.

use crate::{gas, host::Host, instruction_result::InstructionResult, interpreter::Interpreter};
use primitives::{Bytes, Hardfork, U256};

pub fn stop<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.halt(InstructionResult::Stop);
}

pub fn jump<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::MID);
    popn!([target], interpreter);
    jump_inner(interpreter, target);
}

pub fn jumpi<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::HIGH);
    popn!([target, condition], interpreter);
    if !condition.is_zero() {
        jump_inner(interpreter, target);
    }
}

/// Validates the destination against the analysis bitmap; a `0x5B` inside a
/// PUSH immediate never validates.
#[inline]
fn jump_inner(interpreter: &mut Interpreter, target: U256) {
    let target = as_usize_or_fail!(interpreter, target, InstructionResult::InvalidJump);
    if !interpreter.bytecode.is_valid_jump(target) {
        interpreter.halt(InstructionResult::InvalidJump);
        return;
    }
    interpreter.pc = target;
}

pub fn jumpdest<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::JUMPDEST);
}

pub fn pc<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::BASE);
    // The counter was already advanced past this opcode.
    push!(interpreter, U256::from(interpreter.pc - 1));
}

#[inline]
fn return_inner(interpreter: &mut Interpreter, result: InstructionResult) {
    popn!([offset, len], interpreter);
    let len = as_usize_or_fail!(interpreter, len);
    let mut output = Bytes::new();
    if len != 0 {
        let offset = as_usize_or_fail!(interpreter, offset);
        resize_memory!(interpreter, offset, len);
        output = Bytes::copy_from_slice(interpreter.memory.slice(offset, len));
    }
    interpreter.output = output;
    interpreter.halt(result);
}

pub fn ret<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    return_inner(interpreter, InstructionResult::Return);
}

/// EIP-140: REVERT.
pub fn revert<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Byzantium);
    return_inner(interpreter, InstructionResult::Revert);
}

/// The designated INVALID opcode; consumes all remaining gas.
pub fn invalid<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.gas.spend_all();
    interpreter.halt(InstructionResult::InvalidOpcode);
}

/// Any byte without a defined handler.
pub fn unknown<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    interpreter.gas.spend_all();
    interpreter.halt(InstructionResult::InvalidOpcode);
}
