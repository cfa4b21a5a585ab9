//! Contract address derivation for the two creation schemes.

use alloy_primitives::{keccak256, Address, B256, U256};

/// Address for the legacy `CREATE` scheme: `keccak256(rlp([sender, nonce]))[12..]`.
///
/// The RLP payload is a fixed two-item list, so the framing is inlined here
/// rather than pulled from a codec: a 20-byte string, then a trimmed
/// big-endian integer.
pub fn create_address(caller: Address, nonce: u64) -> Address {
    let mut out = Vec::with_capacity(32);
    out.push(0); // list header, patched below
    out.push(0x80 + 20);
    out.extend_from_slice(caller.as_slice());
    if nonce == 0 {
        out.push(0x80);
    } else if nonce < 0x80 {
        out.push(nonce as u8);
    } else {
        let bytes = nonce.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        out.push(0x80 + (8 - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
    // Payload is at most 30 bytes, always the short list form.
    out[0] = 0xc0 + (out.len() - 1) as u8;

    Address::from_slice(&keccak256(&out)[12..])
}

/// Address for the `CREATE2` scheme:
/// `keccak256(0xff ++ sender ++ salt ++ keccak256(init_code))[12..]`.
pub fn create2_address(caller: Address, salt: U256, init_code_hash: B256) -> Address {
    let mut buf = [0u8; 85];
    buf[0] = 0xff;
    buf[1..21].copy_from_slice(caller.as_slice());
    buf[21..53].copy_from_slice(&salt.to_be_bytes::<32>());
    buf[53..85].copy_from_slice(init_code_hash.as_slice());
    Address::from_slice(&keccak256(buf)[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn create_known_vectors() {
        // First two contracts deployed by 0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0.
        let deployer = address!("6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0");
        assert_eq!(
            create_address(deployer, 0),
            address!("cd234a471b72ba2f1ccf0a70fcaba648a5eecd8d")
        );
        assert_eq!(
            create_address(deployer, 1),
            address!("343c43a37d37dff08ae8c4a11544c718abb4fcf8")
        );
    }

    #[test]
    fn create_large_nonce_uses_multi_byte_encoding() {
        let a = create_address(Address::ZERO, 0x80);
        let b = create_address(Address::ZERO, 0x0100);
        assert_ne!(a, b);
    }

    #[test]
    fn create2_eip1014_vector() {
        // Empty-initcode example from the EIP-1014 write-up.
        let addr = create2_address(
            address!("0000000000000000000000000000000000000000"),
            U256::ZERO,
            b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"),
        );
        assert_eq!(addr, address!("e33c0c7f7df4809055c3eba6c09cfe4baf1bd9e0"));
    }
}
