//! Transaction-environment opcodes.

use crate::{gas, host::Host, interpreter::Interpreter};
use primitives::{Hardfork, U256};

pub fn gasprice<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().effective_gas_price());
}

pub fn origin<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    gas!(interpreter, gas::BASE);
    push!(interpreter, host.env().tx.caller.into_word().into());
}

/// EIP-4844: BLOBHASH. Indexes past the transaction's blob list push zero.
pub fn blob_hash<H: Host + ?Sized>(interpreter: &mut Interpreter, host: &mut H) {
    check!(interpreter, Hardfork::Cancun);
    gas!(interpreter, gas::VERYLOW);
    popn_top!([], top, interpreter);
    let index = as_u64_saturated!(top) as usize;
    *top = host
        .env()
        .tx
        .blob_hashes
        .get(index)
        .map(|hash| U256::from_be_bytes(hash.0))
        .unwrap_or_default();
}
