use crate::vector::serde_helpers::{dec_u256, dec_u64};
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The expected post-state of a single account leaf, used as the comparison
/// oracle against on-chain state after a workflow completes.
///
/// Balances and nonces follow the test-vector convention of decimal strings.
/// Storage and code hash are only present for contract accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedLeaf {
    /// The account address.
    pub address: Address,
    /// The expected balance in wei.
    #[serde(with = "dec_u256")]
    pub balance: U256,
    /// The expected account nonce.
    #[serde(with = "dec_u64")]
    pub nonce: u64,
    /// Expected storage slot values, keyed by slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<BTreeMap<U256, U256>>,
    /// Expected hash of the deployed code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_hash: Option<B256>,
}
