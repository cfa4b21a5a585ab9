//! EIP-7702 delegation designators.
//!
//! An externally owned account may point its code at a contract by storing
//! the three magic bytes `0xef0100` followed by the delegate address. Code
//! resolution then loads the delegate's bytecode in place of the designator.

use core::fmt;
use primitives::{Address, Bytes};

/// Designator prefix: `0xef01` magic plus version `0x00`.
pub const EIP7702_MAGIC_BYTES: [u8; 3] = [0xef, 0x01, 0x00];

/// Total length of a designator: prefix + 20-byte address.
pub const EIP7702_LEN: usize = 23;

/// A parsed delegation designator.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eip7702Bytecode {
    delegated_address: Address,
    raw: Bytes,
}

impl fmt::Debug for Eip7702Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eip7702Bytecode")
            .field("delegated_address", &self.delegated_address)
            .finish()
    }
}

impl Eip7702Bytecode {
    /// Builds a designator pointing at `address`.
    pub fn new(address: Address) -> Self {
        let mut raw = Vec::with_capacity(EIP7702_LEN);
        raw.extend_from_slice(&EIP7702_MAGIC_BYTES);
        raw.extend_from_slice(address.as_slice());
        Self {
            delegated_address: address,
            raw: raw.into(),
        }
    }

    /// Parses raw account code as a designator.
    pub fn new_raw(raw: Bytes) -> Result<Self, Eip7702DecodeError> {
        if raw.len() != EIP7702_LEN {
            return Err(Eip7702DecodeError::InvalidLength);
        }
        if raw[..3] != EIP7702_MAGIC_BYTES {
            return Err(Eip7702DecodeError::InvalidMagic);
        }
        Ok(Self {
            delegated_address: Address::from_slice(&raw[3..]),
            raw,
        })
    }

    /// The account whose code this designator delegates to.
    #[inline]
    pub fn address(&self) -> Address {
        self.delegated_address
    }

    /// The designator bytes as stored in the account.
    #[inline]
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }
}

/// Returns `true` if `code` starts with the delegation magic.
pub fn is_designator(code: &[u8]) -> bool {
    code.len() >= 2 && code[0] == 0xef && code[1] == 0x01
}

/// Why raw bytes failed to parse as a designator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eip7702DecodeError {
    /// Designators are exactly 23 bytes.
    InvalidLength,
    /// The `0xef0100` prefix did not match.
    InvalidMagic,
}

impl fmt::Display for Eip7702DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidLength => "delegation designator is not 23 bytes",
            Self::InvalidMagic => "delegation designator magic mismatch",
        };
        f.write_str(s)
    }
}

impl core::error::Error for Eip7702DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{address, bytes};

    fn example_designator() -> Bytes {
        bytes!("ef01000000000000000000000000000000000000000000")
    }

    #[test]
    fn round_trip() {
        let target = address!("1100000000000000000000000000000000000011");
        let designator = Eip7702Bytecode::new(target);
        assert_eq!(designator.raw().len(), EIP7702_LEN);
        let reparsed = Eip7702Bytecode::new_raw(designator.raw().clone()).unwrap();
        assert_eq!(reparsed.address(), target);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Eip7702Bytecode::new_raw(bytes!("ef01")),
            Err(Eip7702DecodeError::InvalidLength)
        );
        let mut raw = example_designator().to_vec();
        raw[2] = 0x01; // unknown version
        assert_eq!(
            Eip7702Bytecode::new_raw(raw.into()),
            Err(Eip7702DecodeError::InvalidMagic)
        );
    }

    #[test]
    fn designator_predicate() {
        assert!(is_designator(&example_designator()));
        assert!(!is_designator(&[0x60, 0x00]));
        assert!(!is_designator(&[0xef]));
    }
}
