//! Valid `JUMP`/`JUMPI` destination table.

use bitvec::{order::Lsb0, vec::BitVec};
use core::fmt;
use primitives::hex;
use std::sync::Arc;

/// Bitmap of valid jump destinations, one bit per byte of code.
///
/// A bit is set only where a `JUMPDEST` byte sits outside any `PUSH`
/// immediate window; it is produced by [`analyze_code`](crate::analyze_code)
/// and immutable afterwards. Cloning is cheap, the bitmap is shared.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpTable(Arc<BitVec<u8, Lsb0>>);

impl fmt::Debug for JumpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JumpTable")
            .field("map", &hex::encode(self.0.as_raw_slice()))
            .finish()
    }
}

impl JumpTable {
    /// Wraps a finished bitmap.
    #[inline]
    pub fn new(bits: BitVec<u8, Lsb0>) -> Self {
        Self(Arc::new(bits))
    }

    /// Number of code bytes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no code bytes are covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `pc` is a valid jump destination.
    #[inline]
    pub fn is_valid(&self, pc: usize) -> bool {
        self.0.get(pc).is_some_and(|bit| *bit)
    }

    /// Iterator over all valid destinations, ascending.
    pub fn iter_valid(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::bitvec;

    #[test]
    fn out_of_range_is_invalid() {
        let table = JumpTable::new(bitvec![u8, Lsb0; 1, 0, 1]);
        assert!(table.is_valid(0));
        assert!(!table.is_valid(1));
        assert!(table.is_valid(2));
        assert!(!table.is_valid(3));
        assert!(!table.is_valid(usize::MAX));
    }

    #[test]
    fn iter_valid_yields_set_bits() {
        let table = JumpTable::new(bitvec![u8, Lsb0; 0, 1, 0, 0, 1]);
        assert_eq!(table.iter_valid().collect::<Vec<_>>(), vec![1, 4]);
    }
}
