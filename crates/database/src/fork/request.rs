//! Typed remote requests and their JSON-RPC wire shapes.

use primitives::{hex, Address, Bytes, B256, U256};
use serde::Deserialize;

/// Block the fork is pinned to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlockTag {
    /// Chain head at resolution time.
    #[default]
    Latest,
    /// A specific block number.
    Number(u64),
}

impl BlockTag {
    /// Renders the tag the way JSON-RPC params expect it.
    pub fn as_param(&self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Number(n) => format!("0x{n:x}"),
        }
    }
}

/// A request the fork backend needs answered out-of-band.
///
/// The backend never performs I/O itself: the driver drains these via
/// `next_pending_request`, executes them against whatever transport it has
/// and feeds the raw response JSON back with `resume`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkRequest {
    /// Identifier to pass back to `resume`.
    pub id: u64,
    /// What is being resolved.
    pub kind: RequestKind,
}

/// The two remote lookups the backend issues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// `eth_getProof`: account fields plus the requested storage slots.
    GetProof {
        /// Account to prove.
        address: Address,
        /// Storage slots to resolve alongside the account.
        slots: Vec<U256>,
        /// Block to resolve at.
        block_tag: BlockTag,
    },
    /// `eth_getCode` for an account whose code hash is known.
    GetCode {
        /// Account owning the code.
        address: Address,
        /// Hash the response will be stored under.
        code_hash: B256,
        /// Block to resolve at.
        block_tag: BlockTag,
    },
}

impl ForkRequest {
    /// JSON-RPC method name.
    pub fn method(&self) -> &'static str {
        match &self.kind {
            RequestKind::GetProof { .. } => "eth_getProof",
            RequestKind::GetCode { .. } => "eth_getCode",
        }
    }

    /// JSON-RPC params array for [`Self::method`].
    pub fn params(&self) -> serde_json::Value {
        match &self.kind {
            RequestKind::GetProof {
                address,
                slots,
                block_tag,
            } => {
                let keys: Vec<String> = slots
                    .iter()
                    .map(|slot| format!("0x{:0>64}", format!("{slot:x}")))
                    .collect();
                serde_json::json!([address, keys, block_tag.as_param()])
            }
            RequestKind::GetCode {
                address, block_tag, ..
            } => serde_json::json!([address, block_tag.as_param()]),
        }
    }

    /// Params rendered to a JSON string.
    pub fn params_json(&self) -> String {
        self.params().to_string()
    }
}

/// `eth_getProof` response body, integers hex-encoded.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    /// Account nonce.
    pub nonce: U256,
    /// Account balance.
    pub balance: U256,
    /// Keccak-256 of the account code; zero or the empty-code hash for
    /// codeless accounts.
    pub code_hash: B256,
    /// Root of the account's storage trie.
    pub storage_hash: B256,
    /// Resolved storage slots.
    #[serde(default)]
    pub storage_proof: Vec<StorageProofEntry>,
}

/// One slot within a proof response.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProofEntry {
    /// Slot key.
    pub key: U256,
    /// Slot value.
    pub value: U256,
    /// Merkle proof nodes; carried but not verified here.
    #[serde(default)]
    pub proof: Vec<Bytes>,
}

/// Parses an `eth_getCode` response (a hex string).
pub fn parse_code_response(response: &str) -> Result<Bytes, String> {
    let text: String = serde_json::from_str(response).map_err(|e| e.to_string())?;
    hex::decode(text.trim_start_matches("0x"))
        .map(Bytes::from)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;

    #[test]
    fn get_proof_params_shape() {
        let request = ForkRequest {
            id: 1,
            kind: RequestKind::GetProof {
                address: address!("1111111111111111111111111111111111111111"),
                slots: vec![U256::from(1)],
                block_tag: BlockTag::Number(0x10),
            },
        };
        assert_eq!(request.method(), "eth_getProof");
        let params = request.params();
        assert_eq!(params[2], "0x10");
        assert_eq!(
            params[1][0],
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn proof_response_parses_hex_quantities() {
        let raw = r#"{
            "nonce": "0x5",
            "balance": "0xde0b6b3a7640000",
            "codeHash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "storageHash": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            "storageProof": [
                {"key": "0x1", "value": "0x2a", "proof": []}
            ]
        }"#;
        let parsed: ProofResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.nonce, U256::from(5));
        assert_eq!(parsed.balance, U256::from(10u64.pow(18)));
        assert_eq!(parsed.storage_proof[0].key, U256::from(1));
        assert_eq!(parsed.storage_proof[0].value, U256::from(42));
    }

    #[test]
    fn code_response_parses_hex_bytes() {
        let code = parse_code_response("\"0x6001600201\"").unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x01, 0x60, 0x02, 0x01]);
    }
}
