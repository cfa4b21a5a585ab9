//! Lazy remote state resolution with a synchronous request pump.
//!
//! [`ForkDb`] answers [`Database`] reads from its policy-bounded caches.
//! On a miss it enqueues a typed [`ForkRequest`] and fails the read with
//! [`ForkDbError::Pending`]; the outermost driver drains
//! [`ForkDb::next_pending_request`], executes each request against its own
//! transport, feeds the raw JSON back through [`ForkDb::resume`] and retries
//! the execution. The backend itself never touches the network, which keeps
//! the interpreter synchronous end to end.

mod cache;
mod request;

pub use cache::{CachePolicy, ForkCache};
pub use request::{
    parse_code_response, BlockTag, ForkRequest, ProofResponse, RequestKind, StorageProofEntry,
};

use crate::Database;
use primitives::{Address, HashMap, B256, KECCAK_EMPTY, U256};
use state::{AccountInfo, Bytecode};
use std::collections::VecDeque;
use thiserror::Error;

/// How many pump-and-retry rounds a driver should attempt before giving up
/// on a remote read.
pub const FORK_RETRY_BUDGET: usize = 10;

/// Errors surfaced by the fork backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForkDbError {
    /// The read needs remote data; request `request_id` is queued.
    #[error("state read pending remote request {request_id}")]
    Pending {
        /// Identifier of the queued request.
        request_id: u64,
    },
    /// `resume` was called with an id that is not in flight.
    #[error("unknown or already-resumed request id {0}")]
    UnknownRequest(u64),
    /// A response could not be decoded.
    #[error("malformed remote response: {0}")]
    InvalidResponse(String),
    /// The read cannot be resolved at all.
    #[error("remote state unavailable: {0}")]
    Unavailable(String),
}

/// A [`Database`] that materialises accounts, storage slots and code from a
/// remote chain on demand.
#[derive(Debug)]
pub struct ForkDb {
    block_tag: BlockTag,
    accounts: ForkCache<Address, AccountInfo>,
    storage: ForkCache<(Address, U256), U256>,
    code: ForkCache<B256, Bytecode>,
    /// Maps code hashes to the account they were seen on, so `code_by_hash`
    /// can be turned back into an addressable `eth_getCode`.
    code_owners: HashMap<B256, Address>,
    pending: VecDeque<ForkRequest>,
    in_flight: HashMap<u64, RequestKind>,
    next_request_id: u64,
}

impl ForkDb {
    /// Creates a fork pinned to `block_tag` with one cache policy for all
    /// three key spaces.
    pub fn new(block_tag: BlockTag, policy: CachePolicy) -> Self {
        Self {
            block_tag,
            accounts: ForkCache::new(policy),
            storage: ForkCache::new(policy),
            code: ForkCache::new(policy),
            code_owners: HashMap::default(),
            pending: VecDeque::new(),
            in_flight: HashMap::default(),
            next_request_id: 0,
        }
    }

    /// Next request the driver should execute, if any.
    pub fn next_pending_request(&mut self) -> Option<ForkRequest> {
        self.pending.pop_front()
    }

    /// Returns `true` while requests are queued or awaiting responses.
    pub fn has_pending_requests(&self) -> bool {
        !self.pending.is_empty() || !self.in_flight.is_empty()
    }

    /// Feeds the raw JSON response for a previously issued request back in.
    pub fn resume(&mut self, request_id: u64, response_json: &str) -> Result<(), ForkDbError> {
        let kind = self
            .in_flight
            .remove(&request_id)
            .ok_or(ForkDbError::UnknownRequest(request_id))?;
        match kind {
            RequestKind::GetProof { address, .. } => {
                let proof: ProofResponse = serde_json::from_str(response_json)
                    .map_err(|e| ForkDbError::InvalidResponse(e.to_string()))?;
                self.absorb_proof(address, proof);
            }
            RequestKind::GetCode { code_hash, .. } => {
                let bytes =
                    parse_code_response(response_json).map_err(ForkDbError::InvalidResponse)?;
                let code = Bytecode::new_raw(bytes);
                tracing::debug!(target: "fork", %code_hash, len = code.len(), "resolved code");
                self.code.insert(code_hash, code);
            }
        }
        Ok(())
    }

    fn absorb_proof(&mut self, address: Address, proof: ProofResponse) {
        // Geth reports the zero hash for accounts without code.
        let code_hash = if proof.code_hash.is_zero() {
            KECCAK_EMPTY
        } else {
            proof.code_hash
        };
        if code_hash != KECCAK_EMPTY {
            self.code_owners.insert(code_hash, address);
        }
        let info = AccountInfo {
            balance: proof.balance,
            nonce: proof.nonce.saturating_to::<u64>(),
            code_hash,
            code: None,
            delegated_address: None,
        };
        tracing::debug!(target: "fork", %address, nonce = info.nonce, "resolved account");
        self.accounts.insert(address, info);
        for entry in proof.storage_proof {
            self.storage.insert((address, entry.key), entry.value);
        }
    }

    fn enqueue(&mut self, kind: RequestKind) -> ForkDbError {
        // One in-flight request per key; a duplicate miss re-reports the
        // already queued id.
        if let Some((id, _)) = self.in_flight.iter().find(|(_, k)| **k == kind) {
            return ForkDbError::Pending { request_id: *id };
        }
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.insert(id, kind.clone());
        self.pending.push_back(ForkRequest { id, kind });
        ForkDbError::Pending { request_id: id }
    }
}

impl Database for ForkDb {
    type Error = ForkDbError;

    fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error> {
        if let Some(info) = self.accounts.get(&address) {
            // A resolved-but-empty account is treated as absent (EIP-161).
            if info.is_empty() {
                return Ok(None);
            }
            return Ok(Some(info.clone()));
        }
        Err(self.enqueue(RequestKind::GetProof {
            address,
            slots: Vec::new(),
            block_tag: self.block_tag,
        }))
    }

    fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error> {
        if code_hash == KECCAK_EMPTY {
            return Ok(Bytecode::default());
        }
        if let Some(code) = self.code.get(&code_hash) {
            return Ok(code.clone());
        }
        let Some(address) = self.code_owners.get(&code_hash).copied() else {
            return Err(ForkDbError::Unavailable(format!(
                "no known account for code hash {code_hash}"
            )));
        };
        Err(self.enqueue(RequestKind::GetCode {
            address,
            code_hash,
            block_tag: self.block_tag,
        }))
    }

    fn storage(&mut self, address: Address, slot: U256) -> Result<U256, Self::Error> {
        if let Some(value) = self.storage.get(&(address, slot)) {
            return Ok(*value);
        }
        Err(self.enqueue(RequestKind::GetProof {
            address,
            slots: vec![slot],
            block_tag: self.block_tag,
        }))
    }

    /// Forks do not replay chains; block hashes keep the deterministic
    /// placeholder shape of the in-memory store.
    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        Ok(primitives::keccak256(number.to_be_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;

    const PROOF: &str = r#"{
        "nonce": "0x2",
        "balance": "0x64",
        "codeHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "storageHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "storageProof": [{"key": "0x1", "value": "0x7", "proof": []}]
    }"#;

    #[test]
    fn miss_enqueues_then_resume_satisfies() {
        let mut db = ForkDb::new(BlockTag::Latest, CachePolicy::Unbounded);
        let addr = address!("00000000000000000000000000000000000000fe");

        let err = db.basic(addr).unwrap_err();
        let ForkDbError::Pending { request_id } = err else {
            panic!("expected pending, got {err:?}");
        };
        let request = db.next_pending_request().unwrap();
        assert_eq!(request.id, request_id);
        assert_eq!(request.method(), "eth_getProof");

        db.resume(request_id, PROOF).unwrap();
        let info = db.basic(addr).unwrap().unwrap();
        assert_eq!(info.nonce, 2);
        assert_eq!(info.balance, U256::from(100));
        // The proof carried slot 1 as well.
        assert_eq!(db.storage(addr, U256::from(1)).unwrap(), U256::from(7));
    }

    #[test]
    fn duplicate_misses_share_one_request() {
        let mut db = ForkDb::new(BlockTag::Latest, CachePolicy::Unbounded);
        let addr = address!("00000000000000000000000000000000000000fe");

        let first = db.basic(addr).unwrap_err();
        let second = db.basic(addr).unwrap_err();
        assert_eq!(first, second);
        assert!(db.next_pending_request().is_some());
        assert!(db.next_pending_request().is_none());
    }

    #[test]
    fn resume_with_unknown_id_fails() {
        let mut db = ForkDb::new(BlockTag::Latest, CachePolicy::Unbounded);
        assert_eq!(db.resume(9, "{}"), Err(ForkDbError::UnknownRequest(9)));
    }

    #[test]
    fn empty_account_reads_as_absent() {
        let mut db = ForkDb::new(BlockTag::Latest, CachePolicy::Unbounded);
        let addr = address!("00000000000000000000000000000000000000fe");
        let empty = r#"{
            "nonce": "0x0",
            "balance": "0x0",
            "codeHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "storageHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "storageProof": []
        }"#;
        let ForkDbError::Pending { request_id } = db.basic(addr).unwrap_err() else {
            panic!("expected pending");
        };
        db.next_pending_request().unwrap();
        db.resume(request_id, empty).unwrap();
        assert_eq!(db.basic(addr).unwrap(), None);
    }

    #[test]
    fn code_resolution_goes_through_owner_address() {
        let mut db = ForkDb::new(BlockTag::Latest, CachePolicy::Unbounded);
        let addr = address!("00000000000000000000000000000000000000cc");
        let code_hash = "0x7d9a6c02f498d2256d119507330b77802d4ca6e0bea01d1ebe42b4ea4b40d2af";
        let proof = format!(
            r#"{{
                "nonce": "0x1",
                "balance": "0x0",
                "codeHash": "{code_hash}",
                "storageHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "storageProof": []
            }}"#
        );
        let ForkDbError::Pending { request_id } = db.basic(addr).unwrap_err() else {
            panic!("expected pending");
        };
        db.next_pending_request().unwrap();
        db.resume(request_id, &proof).unwrap();

        let info = db.basic(addr).unwrap().unwrap();
        let err = db.code_by_hash(info.code_hash).unwrap_err();
        let ForkDbError::Pending { request_id } = err else {
            panic!("expected pending, got {err:?}");
        };
        let request = db.next_pending_request().unwrap();
        assert_eq!(request.method(), "eth_getCode");
        db.resume(request_id, "\"0x6001\"").unwrap();
        let code = db.code_by_hash(info.code_hash).unwrap();
        assert_eq!(code.original_bytes().as_ref(), &[0x60, 0x01]);
    }
}
