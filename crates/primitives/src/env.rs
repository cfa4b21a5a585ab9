//! Execution environment: chain configuration, block context and transaction
//! context consumed by the interpreter's environment opcodes.

use crate::{
    constants::{BLOB_GASPRICE_UPDATE_FRACTION, MIN_BLOB_GASPRICE, TARGET_BLOB_GAS_PER_BLOCK},
    hardfork::Hardfork,
};
use alloy_primitives::{Address, Bytes, B256, U256};

/// Everything the EVM reads from its surroundings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Env {
    /// Chain configuration.
    pub cfg: CfgEnv,
    /// Block the transaction executes in.
    pub block: BlockEnv,
    /// The transaction itself.
    pub tx: TxEnv,
}

impl Env {
    /// Effective per-gas price paid by the caller.
    ///
    /// Pre-London this is the declared gas price; with EIP-1559 fields set it
    /// is `min(gas_price, basefee + priority_fee)`.
    pub fn effective_gas_price(&self) -> U256 {
        let Some(priority_fee) = self.tx.gas_priority_fee else {
            return self.tx.gas_price;
        };
        core::cmp::min(self.tx.gas_price, self.block.basefee + priority_fee)
    }

    /// Price of one unit of blob gas in the current block, if the block
    /// carries EIP-4844 data.
    pub fn blob_gasprice(&self) -> Option<u128> {
        self.block
            .blob_excess_gas_and_price
            .as_ref()
            .map(|b| b.blob_gasprice)
    }
}

/// Chain-level configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgEnv {
    /// Chain id, compared against CHAINID and transaction chain ids.
    pub chain_id: u64,
    /// Active hardfork.
    pub spec: Hardfork,
    /// Overrides the EIP-170 deployed-code size cap when set.
    pub limit_contract_code_size: Option<usize>,
}

impl Default for CfgEnv {
    fn default() -> Self {
        Self {
            chain_id: 1,
            spec: Hardfork::default(),
            limit_contract_code_size: None,
        }
    }
}

/// Block context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEnv {
    /// Block number.
    pub number: U256,
    /// Fee recipient.
    pub coinbase: Address,
    /// Block timestamp in seconds.
    pub timestamp: U256,
    /// Block gas limit.
    pub gas_limit: U256,
    /// EIP-1559 base fee. Zero before London.
    pub basefee: U256,
    /// Proof-of-work difficulty; meaningless after the Merge.
    pub difficulty: U256,
    /// Randomness beacon output, required from the Merge onwards.
    pub prevrandao: Option<B256>,
    /// EIP-4844 excess blob gas and derived blob gas price.
    pub blob_excess_gas_and_price: Option<BlobExcessGasAndPrice>,
}

/// Excess blob gas of the block together with the price derived from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlobExcessGasAndPrice {
    /// `excess_blob_gas` from the block header.
    pub excess_blob_gas: u64,
    /// Price of one unit of blob gas.
    pub blob_gasprice: u128,
}

impl BlobExcessGasAndPrice {
    /// Derives the blob gas price from the header's excess blob gas.
    pub fn new(excess_blob_gas: u64) -> Self {
        Self {
            excess_blob_gas,
            blob_gasprice: calc_blob_gasprice(excess_blob_gas),
        }
    }
}

/// EIP-4844 blob gas price: `MIN_BLOB_GASPRICE * e^(excess / FRACTION)`,
/// computed with the EIP's Taylor-expansion integer approximation.
pub fn calc_blob_gasprice(excess_blob_gas: u64) -> u128 {
    fake_exponential(
        MIN_BLOB_GASPRICE,
        excess_blob_gas,
        BLOB_GASPRICE_UPDATE_FRACTION,
    )
}

/// Integer approximation of `factor * e^(numerator / denominator)` used by
/// EIP-4844. `denominator` must be non-zero.
fn fake_exponential(factor: u64, numerator: u64, denominator: u64) -> u128 {
    assert_ne!(denominator, 0, "attempt to divide by zero");
    let factor = factor as u128;
    let numerator = numerator as u128;
    let denominator = denominator as u128;

    let mut i = 1;
    let mut output = 0;
    let mut numerator_accum = factor * denominator;
    while numerator_accum > 0 {
        output += numerator_accum;
        // Denominator is asserted as not zero at the start of the function.
        numerator_accum = (numerator_accum * numerator) / (denominator * i);
        i += 1;
    }
    output / denominator
}

/// Target of a transaction: message call or contract creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransactTo {
    /// Message call into `Address`.
    Call(Address),
    /// Contract creation; the address is derived from sender and nonce.
    Create,
}

impl TransactTo {
    /// Returns `true` for contract-creating transactions.
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }
}

impl Default for TransactTo {
    fn default() -> Self {
        Self::Call(Address::ZERO)
    }
}

/// Transaction context.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxEnv {
    /// Transaction sender.
    pub caller: Address,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Declared gas price (max fee for EIP-1559 transactions).
    pub gas_price: U256,
    /// EIP-1559 priority fee, `None` for legacy transactions.
    pub gas_priority_fee: Option<U256>,
    /// Call target or creation marker.
    pub transact_to: TransactTo,
    /// Wei transferred with the transaction.
    pub value: U256,
    /// Calldata, or initcode for creation transactions.
    pub data: Bytes,
    /// Expected sender nonce; skipped when `None`.
    pub nonce: Option<u64>,
    /// Expected chain id; skipped when `None` (legacy pre-EIP-155).
    pub chain_id: Option<u64>,
    /// EIP-2930 access list: addresses with their storage keys.
    pub access_list: Vec<(Address, Vec<U256>)>,
    /// EIP-4844 blob versioned hashes.
    pub blob_hashes: Vec<B256>,
    /// EIP-4844 maximum fee per unit of blob gas.
    pub max_fee_per_blob_gas: Option<U256>,
    /// Typed-transaction envelope discriminant, for tracing only.
    pub tx_type: u8,
}

impl Default for TxEnv {
    fn default() -> Self {
        Self {
            caller: Address::ZERO,
            gas_limit: u64::MAX,
            gas_price: U256::ZERO,
            gas_priority_fee: None,
            transact_to: TransactTo::default(),
            value: U256::ZERO,
            data: Bytes::new(),
            nonce: None,
            chain_id: None,
            access_list: Vec::new(),
            blob_hashes: Vec::new(),
            max_fee_per_blob_gas: None,
            tx_type: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_gas_price_caps_at_declared_price() {
        let mut env = Env::default();
        env.tx.gas_price = U256::from(100);
        env.tx.gas_priority_fee = Some(U256::from(10));
        env.block.basefee = U256::from(80);
        assert_eq!(env.effective_gas_price(), U256::from(90));

        env.block.basefee = U256::from(95);
        assert_eq!(env.effective_gas_price(), U256::from(100));

        env.tx.gas_priority_fee = None;
        assert_eq!(env.effective_gas_price(), U256::from(100));
    }

    #[test]
    fn blob_gasprice_at_zero_excess_is_minimum() {
        assert_eq!(calc_blob_gasprice(0), MIN_BLOB_GASPRICE as u128);
    }

    #[test]
    fn blob_gasprice_grows_with_excess() {
        // Values spot-checked against the EIP-4844 reference implementation.
        assert_eq!(calc_blob_gasprice(2_314_057), 1);
        assert_eq!(calc_blob_gasprice(2_314_058), 2);
        assert_eq!(calc_blob_gasprice(10 * 1024 * 1024), 23);
        assert!(calc_blob_gasprice(TARGET_BLOB_GAS_PER_BLOCK * 100) > 100_000);
    }
}
