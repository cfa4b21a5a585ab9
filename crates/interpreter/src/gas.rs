//! Gas accounting.

pub mod calc;
pub mod constants;

pub use calc::*;
pub use constants::*;

/// Gas state of one frame.
///
/// Costs are charged with a checked subtraction *before* an opcode applies
/// any effect, so the remaining counter is monotonically non-increasing and
/// an insufficient charge halts the frame with nothing mutated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gas {
    /// Gas limit of the frame, constant throughout execution.
    limit: u64,
    /// Gas still available.
    remaining: u64,
    /// Accumulated refund, settled at transaction end.
    refunded: i64,
    /// Memory expansion memoisation.
    pub memory: MemoryGas,
}

impl Gas {
    /// A fresh counter with `limit` gas available.
    #[inline]
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
            refunded: 0,
            memory: MemoryGas::new(),
        }
    }

    /// A counter with the limit recorded but nothing left to spend.
    #[inline]
    pub const fn new_spent(limit: u64) -> Self {
        Self {
            limit,
            remaining: 0,
            refunded: 0,
            memory: MemoryGas::new(),
        }
    }

    /// The frame's gas limit.
    #[inline]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas still available.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Gas spent so far.
    #[inline]
    pub const fn spent(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Accumulated refund.
    #[inline]
    pub const fn refunded(&self) -> i64 {
        self.refunded
    }

    /// All-but-one-64th of the remaining gas, the EIP-150 forwarding cap.
    #[inline]
    pub const fn remaining_63_of_64_parts(&self) -> u64 {
        self.remaining - self.remaining / 64
    }

    /// Returns unused gas from a finished child frame.
    #[inline]
    pub fn erase_cost(&mut self, returned: u64) {
        self.remaining += returned;
    }

    /// Consumes everything that is left.
    #[inline]
    pub fn spend_all(&mut self) {
        self.remaining = 0;
    }

    /// Accumulates a refund delta; may go negative mid-transaction, the
    /// final value is clamped at settlement.
    #[inline]
    pub fn record_refund(&mut self, refund: i64) {
        self.refunded += refund;
    }

    /// Clamps the refund to its EIP-3529 cap: one fifth of spent gas from
    /// London, one half before.
    #[inline]
    pub fn set_final_refund(&mut self, is_london: bool) {
        let max_refund_quotient = if is_london { 5 } else { 2 };
        self.refunded = (self.refunded as u64).min(self.spent() / max_refund_quotient) as i64;
    }

    /// Charges `cost`, returning `false` when the frame cannot pay.
    #[inline]
    #[must_use = "the caller must halt with OutOfGas on false"]
    pub fn record_cost(&mut self, cost: u64) -> bool {
        if let Some(remaining) = self.remaining.checked_sub(cost) {
            self.remaining = remaining;
            return true;
        }
        false
    }

    /// Charges memory expansion to `new_words` 32-byte words.
    #[inline]
    #[must_use = "the caller must halt with OutOfGas on failure"]
    pub fn record_memory_expansion(&mut self, new_words: usize) -> MemoryExtensionResult {
        let Some(additional) = self.memory.record_new_len(new_words) else {
            return MemoryExtensionResult::Same;
        };
        if !self.record_cost(additional) {
            return MemoryExtensionResult::OutOfGas;
        }
        MemoryExtensionResult::Extended
    }
}

/// Outcome of a memory expansion charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryExtensionResult {
    /// Memory grew; the buffer must be resized.
    Extended,
    /// The touched region was already allocated.
    Same,
    /// The expansion cost exceeded the remaining gas.
    OutOfGas,
}

/// Memoised memory size and its cumulative expansion cost, so that each
/// expansion pays only the delta of `3·w + w²/512`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryGas {
    /// Allocated size in 32-byte words.
    pub words_num: usize,
    /// Expansion cost already paid for that size.
    pub expansion_cost: u64,
}

impl MemoryGas {
    /// Zero-sized memory.
    pub const fn new() -> Self {
        Self {
            words_num: 0,
            expansion_cost: 0,
        }
    }

    /// Records a new word count, returning the cost delta to charge, or
    /// `None` when the memory does not grow.
    #[inline]
    pub fn record_new_len(&mut self, new_words: usize) -> Option<u64> {
        if new_words <= self.words_num {
            return None;
        }
        self.words_num = new_words;
        let mut cost = calc::memory_gas(new_words);
        core::mem::swap(&mut self.expansion_cost, &mut cost);
        // The new cost is strictly larger, the subtraction cannot wrap.
        Some(self.expansion_cost - cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_cost_is_all_or_nothing() {
        let mut gas = Gas::new(10);
        assert!(gas.record_cost(4));
        assert_eq!(gas.remaining(), 6);
        assert!(!gas.record_cost(7));
        // A failed charge leaves the counter untouched.
        assert_eq!(gas.remaining(), 6);
        assert_eq!(gas.spent(), 4);
    }

    #[test]
    fn memory_expansion_charges_deltas() {
        let mut gas = Gas::new(1_000_000);
        assert_eq!(
            gas.record_memory_expansion(1),
            MemoryExtensionResult::Extended
        );
        let after_one_word = gas.remaining();
        assert_eq!(Gas::new(1_000_000).remaining() - after_one_word, 3);

        // Same size: free.
        assert_eq!(gas.record_memory_expansion(1), MemoryExtensionResult::Same);
        assert_eq!(gas.remaining(), after_one_word);

        // Growing to 32 words costs memory_gas(32) - memory_gas(1).
        assert_eq!(
            gas.record_memory_expansion(32),
            MemoryExtensionResult::Extended
        );
        assert_eq!(
            after_one_word - gas.remaining(),
            calc::memory_gas(32) - calc::memory_gas(1)
        );
    }

    #[test]
    fn final_refund_caps() {
        let mut gas = Gas::new(100);
        assert!(gas.record_cost(50));
        gas.record_refund(100);
        let mut pre_london = gas;
        pre_london.set_final_refund(false);
        assert_eq!(pre_london.refunded(), 25);
        gas.set_final_refund(true);
        assert_eq!(gas.refunded(), 10);
    }

    #[test]
    fn eip150_forwarding_cap() {
        let gas = Gas::new(6400);
        assert_eq!(gas.remaining_63_of_64_parts(), 6300);
    }
}
