//! Two's-complement interpretation of 256-bit words.

use core::cmp::Ordering;
use primitives::U256;

/// The most negative signed 256-bit value, `-2^255`.
pub const MIN_NEGATIVE_VALUE: U256 = U256::from_limbs([0, 0, 0, 0x8000_0000_0000_0000]);

#[inline]
fn is_negative(value: U256) -> bool {
    value.bit(255)
}

/// Signed comparison.
#[inline]
pub fn i256_cmp(first: U256, second: U256) -> Ordering {
    match (is_negative(first), is_negative(second)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // Same sign: two's complement preserves unsigned order.
        _ => first.cmp(&second),
    }
}

/// Signed division. A zero divisor yields zero; `MIN / -1` wraps back to
/// `MIN` (the EVM keeps the i256 overflow rule).
#[inline]
pub fn i256_div(first: U256, second: U256) -> U256 {
    if second.is_zero() {
        return U256::ZERO;
    }
    if first == MIN_NEGATIVE_VALUE && second == U256::MAX {
        return MIN_NEGATIVE_VALUE;
    }
    let first_negative = is_negative(first);
    let second_negative = is_negative(second);
    let quotient = first.wrapping_neg_if(first_negative) / second.wrapping_neg_if(second_negative);
    quotient.wrapping_neg_if(first_negative != second_negative)
}

/// Signed remainder; the result takes the dividend's sign.
#[inline]
pub fn i256_mod(first: U256, second: U256) -> U256 {
    if second.is_zero() {
        return U256::ZERO;
    }
    let first_negative = is_negative(first);
    let remainder =
        first.wrapping_neg_if(first_negative) % second.wrapping_neg_if(is_negative(second));
    remainder.wrapping_neg_if(first_negative)
}

trait WrappingNegIf {
    fn wrapping_neg_if(self, negate: bool) -> Self;
}

impl WrappingNegIf for U256 {
    #[inline]
    fn wrapping_neg_if(self, negate: bool) -> Self {
        if negate {
            self.wrapping_neg()
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neg(value: u64) -> U256 {
        U256::from(value).wrapping_neg()
    }

    #[test]
    fn div_follows_signs() {
        assert_eq!(i256_div(U256::from(100), U256::from(2)), U256::from(50));
        assert_eq!(i256_div(neg(100), U256::from(2)), neg(50));
        assert_eq!(i256_div(U256::from(100), neg(2)), neg(50));
        assert_eq!(i256_div(neg(100), neg(2)), U256::from(50));
        // Truncation toward zero.
        assert_eq!(i256_div(neg(7), U256::from(2)), neg(3));
    }

    #[test]
    fn div_edge_cases() {
        assert_eq!(i256_div(U256::from(5), U256::ZERO), U256::ZERO);
        assert_eq!(i256_div(MIN_NEGATIVE_VALUE, U256::MAX), MIN_NEGATIVE_VALUE);
        assert_eq!(i256_div(MIN_NEGATIVE_VALUE, U256::from(1)), MIN_NEGATIVE_VALUE);
    }

    #[test]
    fn mod_takes_dividend_sign() {
        assert_eq!(i256_mod(U256::from(7), U256::from(3)), U256::from(1));
        assert_eq!(i256_mod(neg(7), U256::from(3)), neg(1));
        assert_eq!(i256_mod(U256::from(7), neg(3)), U256::from(1));
        assert_eq!(i256_mod(neg(7), neg(3)), neg(1));
        assert_eq!(i256_mod(U256::from(7), U256::ZERO), U256::ZERO);
    }

    #[test]
    fn cmp_is_signed() {
        assert_eq!(i256_cmp(neg(1), U256::from(1)), Ordering::Less);
        assert_eq!(i256_cmp(U256::from(1), neg(1)), Ordering::Greater);
        assert_eq!(i256_cmp(neg(1), neg(2)), Ordering::Greater);
        assert_eq!(i256_cmp(MIN_NEGATIVE_VALUE, neg(1)), Ordering::Less);
        assert_eq!(i256_cmp(U256::from(3), U256::from(3)), Ordering::Equal);
    }
}
