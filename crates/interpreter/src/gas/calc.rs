//! Dynamic gas calculations.

use super::constants::*;
use crate::host::SelfDestructResult;
use primitives::{Address, Hardfork, U256};

/// `const`-compatible `?` over `Option`.
macro_rules! tri {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return None,
        }
    };
}

/// Memory expansion cost for `words` allocated words: `3·w + w²/512`.
#[inline]
pub const fn memory_gas(words: usize) -> u64 {
    let words = words as u64;
    MEMORY
        .saturating_mul(words)
        .saturating_add(words.saturating_mul(words) / 512)
}

/// Per-word surcharge over a length in bytes.
#[inline]
pub const fn cost_per_word(len: u64, multiple: u64) -> Option<u64> {
    multiple.checked_mul(len.div_ceil(32))
}

/// `KECCAK256`: `30 + 6·⌈len/32⌉`.
#[inline]
pub const fn keccak256_cost(len: u64) -> Option<u64> {
    KECCAK256.checked_add(tri!(cost_per_word(len, KECCAK256WORD)))
}

/// The `*COPY` family: `3 + 3·⌈len/32⌉`.
#[inline]
pub const fn verylowcopy_cost(len: u64) -> Option<u64> {
    VERYLOW.checked_add(tri!(cost_per_word(len, COPY)))
}

/// `EXTCODECOPY`, access-priced from Berlin.
#[inline]
pub const fn extcodecopy_cost(spec: Hardfork, len: u64, is_cold: bool) -> Option<u64> {
    let base = if spec.is_enabled_in(Hardfork::Berlin) {
        warm_cold_cost(is_cold)
    } else if spec.is_enabled_in(Hardfork::Tangerine) {
        700
    } else {
        20
    };
    base.checked_add(tri!(cost_per_word(len, COPY)))
}

/// `LOGn`: `375 + 8·len + 375·topics`.
#[inline]
pub const fn log_cost(n: u8, len: u64) -> Option<u64> {
    tri!(LOG.checked_add(tri!(LOGDATA.checked_mul(len)))).checked_add(LOGTOPIC * n as u64)
}

/// `EXP`: base plus a per-byte charge on the exponent, repriced by EIP-160.
#[inline]
pub fn exp_cost(spec: Hardfork, power: U256) -> Option<u64> {
    if power.is_zero() {
        return Some(EXP);
    }
    let per_byte = if spec.is_enabled_in(Hardfork::SpuriousDragon) {
        EXP_BYTE_EIP160
    } else {
        EXP_BYTE_FRONTIER
    };
    let byte_len = (power.bit_len() as u64).div_ceil(8);
    EXP.checked_add(per_byte.checked_mul(byte_len)?)
}

/// `CREATE2`: the CREATE base plus hashing the initcode.
#[inline]
pub const fn create2_cost(len: u64) -> Option<u64> {
    CREATE.checked_add(tri!(cost_per_word(len, KECCAK256WORD)))
}

/// EIP-3860 initcode word charge. The length is already capped, this
/// cannot overflow.
#[inline]
pub const fn initcode_cost(len: u64) -> u64 {
    let Some(cost) = cost_per_word(len, INITCODE_WORD_COST) else {
        panic!("initcode cost overflow")
    };
    cost
}

/// Berlin warm/cold account access cost.
#[inline]
pub const fn warm_cold_cost(is_cold: bool) -> u64 {
    if is_cold {
        COLD_ACCOUNT_ACCESS_COST
    } else {
        WARM_STORAGE_READ_COST
    }
}

/// `SLOAD` across its four pricing eras.
#[inline]
pub const fn sload_cost(spec: Hardfork, is_cold: bool) -> u64 {
    if spec.is_enabled_in(Hardfork::Berlin) {
        if is_cold {
            COLD_SLOAD_COST
        } else {
            WARM_STORAGE_READ_COST
        }
    } else if spec.is_enabled_in(Hardfork::Istanbul) {
        // EIP-1884 repricing.
        ISTANBUL_SLOAD_GAS
    } else if spec.is_enabled_in(Hardfork::Tangerine) {
        // EIP-150 repricing.
        200
    } else {
        50
    }
}

/// `BALANCE` across its pricing eras.
#[inline]
pub const fn balance_cost(spec: Hardfork, is_cold: bool) -> u64 {
    if spec.is_enabled_in(Hardfork::Berlin) {
        warm_cold_cost(is_cold)
    } else if spec.is_enabled_in(Hardfork::Istanbul) {
        700
    } else if spec.is_enabled_in(Hardfork::Tangerine) {
        400
    } else {
        20
    }
}

/// `EXTCODESIZE`/`EXTCODEHASH`-style account queries.
#[inline]
pub const fn account_access_cost(spec: Hardfork, is_cold: bool) -> u64 {
    if spec.is_enabled_in(Hardfork::Berlin) {
        warm_cold_cost(is_cold)
    } else if spec.is_enabled_in(Hardfork::Tangerine) {
        700
    } else {
        20
    }
}

/// `SSTORE` cost under the full transition tables.
///
/// Returns `None` for the EIP-1706/2200 sentinel: from Istanbul an SSTORE
/// with at most the call stipend remaining fails outright.
#[inline]
pub fn sstore_cost(
    spec: Hardfork,
    original: U256,
    current: U256,
    new: U256,
    gas_remaining: u64,
    is_cold: bool,
) -> Option<u64> {
    if spec.is_enabled_in(Hardfork::Istanbul) && gas_remaining <= CALL_STIPEND {
        return None;
    }

    if spec.is_enabled_in(Hardfork::Berlin) {
        let mut cost = istanbul_sstore_cost::<WARM_STORAGE_READ_COST, WARM_SSTORE_RESET>(
            original, current, new,
        );
        if is_cold {
            cost += COLD_SLOAD_COST;
        }
        Some(cost)
    } else if spec.is_enabled_in(Hardfork::Istanbul) {
        Some(istanbul_sstore_cost::<ISTANBUL_SLOAD_GAS, SSTORE_RESET>(
            original, current, new,
        ))
    } else {
        Some(frontier_sstore_cost(current, new))
    }
}

/// EIP-2200 net gas metering.
#[inline]
fn istanbul_sstore_cost<const SLOAD_GAS: u64, const SSTORE_RESET_GAS: u64>(
    original: U256,
    current: U256,
    new: U256,
) -> u64 {
    if new == current {
        SLOAD_GAS
    } else if original == current && original.is_zero() {
        SSTORE_SET
    } else if original == current {
        SSTORE_RESET_GAS
    } else {
        SLOAD_GAS
    }
}

/// Frontier: set on zero -> non-zero, reset otherwise.
#[inline]
fn frontier_sstore_cost(current: U256, new: U256) -> u64 {
    if current.is_zero() && !new.is_zero() {
        SSTORE_SET
    } else {
        SSTORE_RESET
    }
}

/// `SSTORE` refund under the full transition tables.
#[allow(clippy::collapsible_else_if)]
#[inline]
pub fn sstore_refund(spec: Hardfork, original: U256, current: U256, new: U256) -> i64 {
    if spec.is_enabled_in(Hardfork::Istanbul) {
        // EIP-3529 halves the clear refund.
        let sstore_clears_schedule = if spec.is_enabled_in(Hardfork::London) {
            (SSTORE_RESET - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY) as i64
        } else {
            REFUND_SSTORE_CLEARS
        };
        if current == new {
            0
        } else {
            if original == current && new.is_zero() {
                sstore_clears_schedule
            } else {
                let mut refund = 0;

                if !original.is_zero() {
                    if current.is_zero() {
                        refund -= sstore_clears_schedule;
                    } else if new.is_zero() {
                        refund += sstore_clears_schedule;
                    }
                }

                if original == new {
                    let (reset_gas, sload_gas) = if spec.is_enabled_in(Hardfork::Berlin) {
                        (WARM_SSTORE_RESET, WARM_STORAGE_READ_COST)
                    } else {
                        (SSTORE_RESET, sload_cost(spec, false))
                    };
                    if original.is_zero() {
                        refund += (SSTORE_SET - sload_gas) as i64;
                    } else {
                        refund += (reset_gas - sload_gas) as i64;
                    }
                }

                refund
            }
        }
    } else {
        if !current.is_zero() && new.is_zero() {
            REFUND_SSTORE_CLEARS
        } else {
            0
        }
    }
}

/// `SELFDESTRUCT` cost; the refund (24000 pre-London, 0 after) is recorded
/// separately by the handler.
#[inline]
pub const fn selfdestruct_cost(spec: Hardfork, res: SelfDestructResult, is_cold: bool) -> u64 {
    // EIP-161 narrows the new-account surcharge to value-moving destructs.
    let should_charge_topup = if spec.is_enabled_in(Hardfork::SpuriousDragon) {
        res.had_value && !res.target_exists
    } else {
        !res.target_exists
    };

    let topup = if spec.is_enabled_in(Hardfork::Tangerine) && should_charge_topup {
        25000
    } else {
        0
    };
    let base = if spec.is_enabled_in(Hardfork::Tangerine) {
        5000
    } else {
        0
    };

    let mut gas = base + topup;
    if spec.is_enabled_in(Hardfork::Berlin) && is_cold {
        gas += COLD_ACCOUNT_ACCESS_COST;
    }
    gas
}

/// Static portion of a CALL-family charge.
///
/// Dynamic parts on top: account access (cold/warm), value-transfer
/// surcharge, new-account surcharge (value-moving only from Spurious
/// Dragon).
#[inline]
pub const fn call_cost(
    spec: Hardfork,
    transfers_value: bool,
    is_cold: bool,
    new_account_accounting: bool,
) -> u64 {
    let mut gas = if spec.is_enabled_in(Hardfork::Berlin) {
        warm_cold_cost(is_cold)
    } else if spec.is_enabled_in(Hardfork::Tangerine) {
        // EIP-150 repricing.
        700
    } else {
        40
    };

    if transfers_value {
        gas += CALLVALUE;
    }

    if new_account_accounting {
        if spec.is_enabled_in(Hardfork::SpuriousDragon) {
            if transfers_value {
                gas += NEWACCOUNT;
            }
        } else {
            gas += NEWACCOUNT;
        }
    }

    gas
}

/// Intrinsic gas of a transaction: base stipend, calldata bytes, access
/// list and, from Shanghai, initcode words.
pub fn validate_initial_tx_gas(
    spec: Hardfork,
    input: &[u8],
    is_create: bool,
    access_list: &[(Address, Vec<U256>)],
) -> u64 {
    let zero_data_len = input.iter().filter(|byte| **byte == 0).count() as u64;
    let non_zero_data_len = input.len() as u64 - zero_data_len;

    let mut gas = if is_create && spec.is_enabled_in(Hardfork::Homestead) {
        // EIP-2.
        TRANSACTION_CREATE_HOMESTEAD
    } else {
        TRANSACTION_BASE
    };

    gas += zero_data_len * TRANSACTION_ZERO_DATA;
    // EIP-2028 calldata repricing.
    gas += non_zero_data_len
        * if spec.is_enabled_in(Hardfork::Istanbul) {
            TRANSACTION_NON_ZERO_DATA_ISTANBUL
        } else {
            TRANSACTION_NON_ZERO_DATA_FRONTIER
        };

    if spec.is_enabled_in(Hardfork::Berlin) {
        let accessed_slots: u64 = access_list
            .iter()
            .map(|(_, slots)| slots.len() as u64)
            .sum();
        gas += access_list.len() as u64 * ACCESS_LIST_ADDRESS;
        gas += accessed_slots * ACCESS_LIST_STORAGE_KEY;
    }

    if spec.is_enabled_in(Hardfork::Shanghai) && is_create {
        gas += initcode_cost(input.len() as u64);
    }

    gas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_cost_counts_exponent_bytes() {
        let spec = Hardfork::Latest;
        assert_eq!(exp_cost(spec, U256::ZERO), Some(EXP));
        assert_eq!(exp_cost(spec, U256::from(1)), Some(EXP + 50));
        assert_eq!(exp_cost(spec, U256::from(255)), Some(EXP + 50));
        assert_eq!(exp_cost(spec, U256::from(256)), Some(EXP + 100));
        assert_eq!(exp_cost(spec, U256::MAX), Some(EXP + 50 * 32));
        // Pre-EIP-160 the byte price was 10.
        assert_eq!(
            exp_cost(Hardfork::Homestead, U256::from(256)),
            Some(EXP + 20)
        );
    }

    #[test]
    fn keccak_cost_matches_schedule() {
        assert_eq!(keccak256_cost(0), Some(30));
        assert_eq!(keccak256_cost(1), Some(36));
        assert_eq!(keccak256_cost(32), Some(36));
        assert_eq!(keccak256_cost(33), Some(42));
    }

    #[test]
    fn memory_gas_is_quadratic() {
        assert_eq!(memory_gas(0), 0);
        assert_eq!(memory_gas(1), 3);
        assert_eq!(memory_gas(32), 32 * 3 + (32 * 32) / 512);
        assert_eq!(memory_gas(1024), 1024 * 3 + (1024 * 1024) / 512);
    }

    #[test]
    fn sstore_set_costs_20k_post_london() {
        let spec = Hardfork::London;
        // original=0, current=0, new=5, warm slot.
        assert_eq!(
            sstore_cost(spec, U256::ZERO, U256::ZERO, U256::from(5), 10_000, false),
            Some(SSTORE_SET)
        );
    }

    #[test]
    fn sstore_clear_refund_post_london() {
        let spec = Hardfork::London;
        // original=0 so clearing a freshly-set slot refunds set - warm read.
        assert_eq!(
            sstore_refund(spec, U256::ZERO, U256::from(5), U256::ZERO),
            (SSTORE_SET - WARM_STORAGE_READ_COST) as i64
        );
        // original non-zero: the EIP-3529 clear schedule.
        assert_eq!(
            sstore_refund(spec, U256::from(5), U256::from(5), U256::ZERO),
            (SSTORE_RESET - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY) as i64
        );
        // Pre-London clear refund is the classic 15000.
        assert_eq!(
            sstore_refund(Hardfork::Berlin, U256::from(5), U256::from(5), U256::ZERO),
            REFUND_SSTORE_CLEARS
        );
    }

    #[test]
    fn sstore_stipend_sentinel() {
        assert_eq!(
            sstore_cost(
                Hardfork::Istanbul,
                U256::ZERO,
                U256::ZERO,
                U256::from(1),
                CALL_STIPEND,
                false
            ),
            None
        );
    }

    #[test]
    fn call_cost_new_account_needs_value_post_eip161() {
        assert_eq!(
            call_cost(Hardfork::Berlin, false, true, true),
            COLD_ACCOUNT_ACCESS_COST
        );
        assert_eq!(
            call_cost(Hardfork::Berlin, true, true, true),
            COLD_ACCOUNT_ACCESS_COST + CALLVALUE + NEWACCOUNT
        );
        assert_eq!(call_cost(Hardfork::Homestead, false, false, true), 40 + NEWACCOUNT);
    }

    #[test]
    fn intrinsic_gas_counts_calldata() {
        let data = [0u8, 1, 0, 2];
        assert_eq!(
            validate_initial_tx_gas(Hardfork::London, &data, false, &[]),
            21000 + 2 * 4 + 2 * 16
        );
        assert_eq!(
            validate_initial_tx_gas(Hardfork::Homestead, &data, false, &[]),
            21000 + 2 * 4 + 2 * 68
        );
    }

    #[test]
    fn intrinsic_gas_counts_access_list_and_initcode() {
        let list = vec![(Address::ZERO, vec![U256::ZERO, U256::from(1)])];
        assert_eq!(
            validate_initial_tx_gas(Hardfork::London, &[], false, &list),
            21000 + ACCESS_LIST_ADDRESS + 2 * ACCESS_LIST_STORAGE_KEY
        );
        // Creation from Shanghai adds 2 per initcode word.
        let initcode = [0xFFu8; 64];
        assert_eq!(
            validate_initial_tx_gas(Hardfork::Shanghai, &initcode, true, &[]),
            53000 + 64 * 16 + 2 * 2
        );
    }
}
