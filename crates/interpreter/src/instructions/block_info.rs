//! Block-environment opcodes.

use crate::{gas, host::Host, interpreter::Interpreter};
use primitives::{Hardfork, U256};

pub fn coinbase<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(
        interpreter,
        host.env().block.coinbase.into_word().into()
    );
}

pub fn timestamp<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.timestamp);
}

pub fn block_number<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.number);
}

/// DIFFICULTY before the Merge, PREVRANDAO after (EIP-4399).
pub fn difficulty<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    let value = if interpreter.spec.is_enabled_in(Hardfork::Merge) {
        host.env()
            .block
            .prevrandao
            .map(|hash| U256::from_be_bytes(hash.0))
            .unwrap_or_default()
    } else {
        host.env().block.difficulty
    };
    push!(interpreter, value);
}

pub fn gaslimit<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.gas_limit);
}

/// EIP-1344: CHAINID.
pub fn chainid<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Istanbul);
    gas!(interpreter, gas::BASE);
    push!(interpreter, U256::from(host.env().cfg.chain_id));
}

/// EIP-3198: BASEFEE.
pub fn basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::London);
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().block.basefee);
}

/// EIP-7516: BLOBBASEFEE.
pub fn blob_basefee<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Cancun);
    gas!(interpreter, gas::BASE);
    let price = host.env().blob_gasprice().unwrap_or_default();
    push!(interpreter, U256::from(price));
}
