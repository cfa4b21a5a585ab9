//! The frame's word stack.

use crate::instruction_result::InstructionResult;
use core::fmt;
use primitives::U256;

/// Stack capacity in words.
pub const STACK_LIMIT: usize = 1024;

/// A bounded stack of 256-bit words; the top is the last element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    data: Vec<U256>,
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, word) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{word}")?;
        }
        f.write_str("]")
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// An empty stack with full capacity reserved.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(STACK_LIMIT),
        }
    }

    /// Current height in words.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when nothing is on the stack.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The words, bottom first.
    #[inline]
    pub fn data(&self) -> &[U256] {
        &self.data
    }

    /// Drops everything.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Pops the top word.
    #[inline]
    pub fn pop(&mut self) -> Result<U256, InstructionResult> {
        self.data.pop().ok_or(InstructionResult::StackUnderflow)
    }

    /// Pops `N` words, top first.
    #[inline]
    pub fn popn<const N: usize>(&mut self) -> Option<[U256; N]> {
        if self.data.len() < N {
            return None;
        }
        // Length checked above; each pop yields.
        Some(core::array::from_fn(|_| self.data.pop().unwrap()))
    }

    /// Pops `POPN` words and exposes the new top in place, the common
    /// shape of binary operators.
    #[inline]
    pub fn popn_top<const POPN: usize>(&mut self) -> Option<([U256; POPN], &mut U256)> {
        if self.data.len() < POPN + 1 {
            return None;
        }
        let popped = core::array::from_fn(|_| self.data.pop().unwrap());
        Some((popped, self.data.last_mut().unwrap()))
    }

    /// Pushes a word. Returns `false`, leaving the stack unchanged, when
    /// the limit is hit.
    #[inline]
    #[must_use]
    pub fn push(&mut self, value: U256) -> bool {
        if self.data.len() == STACK_LIMIT {
            return false;
        }
        self.data.push(value);
        true
    }

    /// Pushes up to 32 big-endian bytes zero-extended into one word.
    #[inline]
    #[must_use]
    pub fn push_slice(&mut self, slice: &[u8]) -> bool {
        let Some(word) = U256::try_from_be_slice(slice) else {
            return false;
        };
        self.push(word)
    }

    /// Reads the word `n` positions below the top.
    #[inline]
    pub fn peek(&self, n: usize) -> Result<U256, InstructionResult> {
        if self.data.len() > n {
            Ok(self.data[self.data.len() - n - 1])
        } else {
            Err(InstructionResult::StackUnderflow)
        }
    }

    /// Duplicates the `n`-th word from the top (`DUPn`, 1-based).
    #[inline]
    #[must_use]
    pub fn dup(&mut self, n: usize) -> bool {
        let len = self.data.len();
        if len < n || len == STACK_LIMIT {
            return false;
        }
        self.data.push(self.data[len - n]);
        true
    }

    /// Swaps the top with the word `n` positions below it (`SWAPn`).
    #[inline]
    #[must_use]
    pub fn exchange(&mut self, n: usize) -> bool {
        let len = self.data.len();
        if len <= n {
            return false;
        }
        self.data.swap(len - 1, len - 1 - n);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_order() {
        let mut stack = Stack::new();
        assert!(stack.push(U256::from(1)));
        assert!(stack.push(U256::from(2)));
        let [top, next] = stack.popn::<2>().unwrap();
        assert_eq!(top, U256::from(2));
        assert_eq!(next, U256::from(1));
        assert!(stack.popn::<1>().is_none());
    }

    #[test]
    fn overflow_leaves_stack_unchanged() {
        let mut stack = Stack::new();
        for i in 0..STACK_LIMIT {
            assert!(stack.push(U256::from(i)));
        }
        assert!(!stack.push(U256::ZERO));
        assert_eq!(stack.len(), STACK_LIMIT);
    }

    #[test]
    fn popn_top_exposes_new_top() {
        let mut stack = Stack::new();
        for i in 1..=3u64 {
            assert!(stack.push(U256::from(i)));
        }
        let ([top], under) = stack.popn_top::<1>().unwrap();
        assert_eq!(top, U256::from(3));
        assert_eq!(*under, U256::from(2));
        *under = U256::from(9);
        assert_eq!(stack.peek(0).unwrap(), U256::from(9));
    }

    #[test]
    fn dup_and_exchange() {
        let mut stack = Stack::new();
        assert!(stack.push(U256::from(10)));
        assert!(stack.push(U256::from(20)));
        assert!(stack.dup(2));
        assert_eq!(stack.peek(0).unwrap(), U256::from(10));
        assert!(stack.exchange(2));
        assert_eq!(stack.peek(2).unwrap(), U256::from(10));
        assert!(!stack.exchange(5));
    }

    #[test]
    fn push_slice_zero_extends() {
        let mut stack = Stack::new();
        assert!(stack.push_slice(&[0x01, 0x02]));
        assert_eq!(stack.peek(0).unwrap(), U256::from(0x0102));
        assert!(stack.push_slice(&[]));
        assert_eq!(stack.peek(0).unwrap(), U256::ZERO);
    }
}
