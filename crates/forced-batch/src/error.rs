use alloy_json_rpc::RpcError;
use alloy_primitives::{Address, B256, U256};
use alloy_transport::TransportErrorKind;
use rollup_ops_confirm::ConfirmError;
use rollup_ops_l1::L1Error;
use rollup_ops_poller::TimeoutExpired;
use rollup_ops_verifier::{Retryable, VerifierError};

/// The account field a leaf mismatch was detected on.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LeafField {
    /// The account balance.
    #[display("balance")]
    Balance,
    /// The account nonce.
    #[display("nonce")]
    Nonce,
    /// A storage slot.
    #[display("storage[{_0}]")]
    Storage(U256),
    /// The hash of the deployed code.
    #[display("code hash")]
    CodeHash,
}

/// An error that aborted a forced-batch run.
///
/// Only two conditions are ever retried in place — logs not yet indexed and
/// the batch not yet synchronized — and both surface as [`Self::RetryTimeout`]
/// if they never resolve. Everything else aborts the run where it happened;
/// an already-submitted L1 transaction is not rolled back because the chain
/// cannot be.
#[derive(Debug, thiserror::Error)]
pub enum ForcedBatchError {
    /// An L1 contract interaction failed.
    #[error(transparent)]
    L1(#[from] L1Error),
    /// A transaction confirmation failed, reverted or timed out.
    #[error(transparent)]
    Confirm(#[from] ConfirmError),
    /// A cross-layer wait failed or timed out.
    #[error(transparent)]
    Verifier(#[from] VerifierError),
    /// An L2 state read failed at the RPC level.
    #[error("state read rpc error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// A retryable condition never resolved before its deadline.
    #[error("gave up waiting on {waiting_on}: {source}")]
    RetryTimeout {
        /// The condition that was being retried.
        waiting_on: Retryable,
        /// The expired poll.
        #[source]
        source: TimeoutExpired,
    },
    /// The node's exit root does not match the value finalized on L1.
    #[error("global exit root mismatch: l1 has {onchain}, node has {node}")]
    ExitRootMismatch {
        /// The exit root read from the L1 contract.
        onchain: B256,
        /// The node's view of it.
        node: B256,
    },
    /// An account leaf does not match the expected post-state.
    #[error("leaf mismatch at {address}, {field}: expected {expected}, got {actual}")]
    LeafMismatch {
        /// The account the mismatch was detected on.
        address: Address,
        /// The mismatching field.
        field: LeafField,
        /// The expected value.
        expected: String,
        /// The value read from the node.
        actual: String,
    },
    /// The node stopped reporting a batch it had previously resolved.
    #[error("batch {0} vanished from the node")]
    BatchVanished(u64),
    /// The resolved batch contains no blocks to verify state against.
    #[error("batch {0} contains no blocks")]
    EmptyBatch(u64),
    /// The node does not know a block referenced by the resolved batch.
    #[error("unknown block {0}")]
    UnknownBlock(B256),
}
