use alloy_primitives::{Address, B256, U64};
use serde::{Deserialize, Serialize};

/// A batch as reported by the node's batch-by-number endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBatch {
    /// The batch number.
    pub number: U64,
    /// The sequencer address the batch credits fees to.
    pub coinbase: Address,
    /// The state root the batch settles on.
    pub state_root: B256,
    /// The global exit root the batch was processed with.
    pub global_exit_root: B256,
    /// The batch timestamp.
    pub timestamp: U64,
    /// Whether the node has closed the batch.
    #[serde(default)]
    pub closed: bool,
    /// The L1 transaction that sequenced the batch, once virtualized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_sequences_tx_hash: Option<B256>,
    /// The L1 transaction that verified the batch's proof, once consolidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_batch_tx_hash: Option<B256>,
    /// The hashes of the L2 blocks contained in the batch.
    #[serde(default)]
    pub blocks: Vec<B256>,
    /// The forced batch number, for batches created through the forced path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_batch_number: Option<U64>,
}
