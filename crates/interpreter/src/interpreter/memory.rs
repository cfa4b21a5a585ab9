//! Frame-owned byte memory.
//!
//! Conceptually infinite and zero-initialised; what is tracked is the
//! *allocated* prefix, which is always a multiple of 32 bytes. Expansion is
//! charged before the buffer grows, so accessors can assume the region they
//! touch is allocated.

use core::fmt;
use primitives::{hex, U256};

/// Byte-addressable memory of one frame.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    data: Vec<u8>,
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("len", &self.data.len())
            .field("data", &hex::encode_prefixed(&self.data))
            .finish()
    }
}

impl Memory {
    /// Empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocated size in bytes, always a multiple of 32.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` before the first expansion.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grows the allocation to `new_size` bytes, zero-filling. The caller
    /// has already charged expansion and rounded to a word multiple.
    #[inline]
    pub fn resize(&mut self, new_size: usize) {
        debug_assert!(new_size % 32 == 0, "memory size must stay word aligned");
        if new_size > self.data.len() {
            self.data.resize(new_size, 0);
        }
    }

    /// The allocated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// A view of `[offset, offset + size)`.
    ///
    /// # Panics
    ///
    /// Panics if the region was not allocated first.
    #[inline]
    pub fn slice(&self, offset: usize, size: usize) -> &[u8] {
        &self.data[offset..offset + size]
    }

    /// A mutable view of `[offset, offset + size)`.
    ///
    /// # Panics
    ///
    /// Panics if the region was not allocated first.
    #[inline]
    pub fn slice_mut(&mut self, offset: usize, size: usize) -> &mut [u8] {
        &mut self.data[offset..offset + size]
    }

    /// Reads the 32-byte word at `offset`.
    #[inline]
    pub fn get_u256(&self, offset: usize) -> U256 {
        U256::from_be_slice(self.slice(offset, 32))
    }

    /// Writes one byte.
    #[inline]
    pub fn set_byte(&mut self, offset: usize, byte: u8) {
        self.data[offset] = byte;
    }

    /// Writes a 32-byte word.
    #[inline]
    pub fn set_u256(&mut self, offset: usize, value: U256) {
        self.set(offset, &value.to_be_bytes::<32>());
    }

    /// Writes `value` at `offset`.
    #[inline]
    pub fn set(&mut self, offset: usize, value: &[u8]) {
        if !value.is_empty() {
            self.slice_mut(offset, value.len()).copy_from_slice(value);
        }
    }

    /// Copies `len` bytes of `data` starting at `data_offset` into memory
    /// at `memory_offset`, zero-filling whatever `data` cannot cover. This
    /// is the CALLDATACOPY/CODECOPY/RETURNDATACOPY shape.
    #[inline]
    pub fn set_data(&mut self, memory_offset: usize, data_offset: usize, len: usize, data: &[u8]) {
        if len == 0 {
            return;
        }
        if data_offset >= data.len() {
            self.slice_mut(memory_offset, len).fill(0);
            return;
        }
        let copy_len = usize::min(len, data.len() - data_offset);
        self.slice_mut(memory_offset, copy_len)
            .copy_from_slice(&data[data_offset..data_offset + copy_len]);
        self.slice_mut(memory_offset + copy_len, len - copy_len).fill(0);
    }

    /// Copies within memory (`MCOPY`); ranges may overlap.
    #[inline]
    pub fn copy(&mut self, dst: usize, src: usize, len: usize) {
        self.data.copy_within(src..src + len, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_zero_fills_and_keeps_alignment() {
        let mut memory = Memory::new();
        memory.resize(64);
        assert_eq!(memory.len(), 64);
        assert!(memory.as_slice().iter().all(|b| *b == 0));
        // Shrinking never happens.
        memory.resize(32);
        assert_eq!(memory.len(), 64);
    }

    #[test]
    fn word_round_trip() {
        let mut memory = Memory::new();
        memory.resize(64);
        memory.set_u256(32, U256::from(0xDEADBEEFu64));
        assert_eq!(memory.get_u256(32), U256::from(0xDEADBEEFu64));
        assert_eq!(memory.get_u256(0), U256::ZERO);
    }

    #[test]
    fn set_data_zero_fills_the_tail() {
        let mut memory = Memory::new();
        memory.resize(32);
        memory.slice_mut(0, 32).fill(0xFF);
        memory.set_data(0, 2, 8, &[1, 2, 3, 4]);
        assert_eq!(memory.slice(0, 8), &[3, 4, 0, 0, 0, 0, 0, 0]);
        // Out-of-range source: everything zeroed.
        memory.set_data(8, 10, 4, &[1, 2]);
        assert_eq!(memory.slice(8, 4), &[0, 0, 0, 0]);
    }

    #[test]
    fn copy_handles_overlap() {
        let mut memory = Memory::new();
        memory.resize(32);
        memory.set(0, &[1, 2, 3, 4]);
        memory.copy(2, 0, 4);
        assert_eq!(memory.slice(0, 6), &[1, 2, 1, 2, 3, 4]);
    }
}
