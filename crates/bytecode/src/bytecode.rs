//! Account code in its two supported shapes.

use crate::{analysis::AnalyzedBytecode, eip7702::Eip7702Bytecode};
use primitives::{keccak256, Address, Bytes, B256, KECCAK_EMPTY};

/// Code attached to an account.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bytecode {
    /// Ordinary contract code, jump-analyzed and STOP-padded.
    Analyzed(AnalyzedBytecode),
    /// EIP-7702 delegation designator; execution resolves to the delegate's
    /// code instead.
    Eip7702(Eip7702Bytecode),
}

impl Default for Bytecode {
    fn default() -> Self {
        Self::new_raw(Bytes::new())
    }
}

impl Bytecode {
    /// Analyzes raw contract code.
    pub fn new_raw(code: Bytes) -> Self {
        Self::Analyzed(AnalyzedBytecode::new(&code))
    }

    /// Builds a delegation designator to `address`.
    pub fn new_eip7702(address: Address) -> Self {
        Self::Eip7702(Eip7702Bytecode::new(address))
    }

    /// The code as it would be committed to state, without padding.
    pub fn original_bytes(&self) -> Bytes {
        match self {
            Self::Analyzed(code) => code.original_bytes(),
            Self::Eip7702(code) => code.raw().clone(),
        }
    }

    /// Length of the unpadded code.
    pub fn len(&self) -> usize {
        match self {
            Self::Analyzed(code) => code.original_len(),
            Self::Eip7702(code) => code.raw().len(),
        }
    }

    /// Returns `true` for empty code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keccak-256 of the unpadded code; [`KECCAK_EMPTY`] for empty code.
    pub fn hash_slow(&self) -> B256 {
        if self.is_empty() {
            KECCAK_EMPTY
        } else {
            keccak256(self.original_bytes())
        }
    }

    /// Delegate target when this code is a designator.
    pub fn eip7702_address(&self) -> Option<Address> {
        match self {
            Self::Eip7702(code) => Some(code.address()),
            Self::Analyzed(_) => None,
        }
    }

    /// The analyzed form, if this is ordinary code.
    pub fn as_analyzed(&self) -> Option<&AnalyzedBytecode> {
        match self {
            Self::Analyzed(code) => Some(code),
            Self::Eip7702(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;

    #[test]
    fn empty_code_hashes_to_keccak_empty() {
        assert_eq!(Bytecode::default().hash_slow(), KECCAK_EMPTY);
    }

    #[test]
    fn hash_ignores_analysis_padding() {
        // Code ends mid-PUSH; analysis pads it, the hash must not see that.
        let raw = Bytes::from_static(&[0x60]);
        let code = Bytecode::new_raw(raw.clone());
        assert_eq!(code.original_bytes(), raw);
        assert_eq!(code.hash_slow(), keccak256(&raw));
    }

    #[test]
    fn designator_round_trips_address() {
        let target = address!("00000000000000000000000000000000deadbeef");
        let code = Bytecode::new_eip7702(target);
        assert_eq!(code.eip7702_address(), Some(target));
        assert_eq!(code.len(), 23);
    }
}
