//! Comparison and bitwise opcodes.

use super::i256::i256_cmp;
use crate::{gas, host::Host, interpreter::Interpreter};
use core::cmp::Ordering;
use primitives::{Hardfork, U256};

pub fn lt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(op1 < *op2);
}

pub fn gt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(op1 > *op2);
}

pub fn slt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(i256_cmp(op1, *op2) == Ordering::Less);
}

pub fn sgt<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(i256_cmp(op1, *op2) == Ordering::Greater);
}

pub fn eq<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = U256::from(op1 == *op2);
}

pub fn iszero<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([], op1, interpreter);
    *op1 = U256::from(op1.is_zero());
}

pub fn bitand<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = op1 & *op2;
}

pub fn bitor<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = op1 | *op2;
}

pub fn bitxor<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = op1 ^ *op2;
}

pub fn not<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([], op1, interpreter);
    *op1 = !*op1;
}

/// `BYTE(i, x)`: the `i`-th byte of `x`, counting from the most
/// significant; zero when `i >= 32`.
pub fn byte<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    gas!(interpreter, gas::VERYLOW);
    popn_top!([op1], op2, interpreter);
    *op2 = if op1 < U256::from(32) {
        U256::from(op2.byte(31 - op1.as_limbs()[0] as usize))
    } else {
        U256::ZERO
    };
}

/// EIP-145 logical shift left.
pub fn shl<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Constantinople);
    gas!(interpreter, gas::VERYLOW);
    popn_top!([shift], value, interpreter);
    *value = if shift < U256::from(256) {
        *value << shift.as_limbs()[0] as usize
    } else {
        U256::ZERO
    };
}

/// EIP-145 logical shift right.
pub fn shr<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Constantinople);
    gas!(interpreter, gas::VERYLOW);
    popn_top!([shift], value, interpreter);
    *value = if shift < U256::from(256) {
        *value >> shift.as_limbs()[0] as usize
    } else {
        U256::ZERO
    };
}

/// EIP-145 arithmetic shift right: vacated bits copy the sign bit.
pub fn sar<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    check!(interpreter, Hardfork::Constantinople);
    gas!(interpreter, gas::VERYLOW);
    popn_top!([shift], value, interpreter);
    *value = if shift < U256::from(256) {
        value.arithmetic_shr(shift.as_limbs()[0] as usize)
    } else if value.bit(255) {
        U256::MAX
    } else {
        U256::ZERO
    };
}
