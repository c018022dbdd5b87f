use alloy_json_rpc::RpcError;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_transport::TransportErrorKind;
use rollup_ops_poller::TimeoutExpired;

/// An error that occurred while waiting for a transaction confirmation.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    /// The transaction was not mined before the deadline.
    #[error(transparent)]
    Timeout(#[from] TimeoutExpired),
    /// The receipt query failed at the RPC level.
    #[error("confirmation rpc error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// The transaction was mined but reverted. The reason is best-effort: it
    /// is recovered by replaying the call against historical state and falls
    /// back to raw error text or hex output when decoding fails.
    #[error("transaction {} reverted: {reason}", .receipt.transaction_hash)]
    TransactionFailed {
        /// The decoded revert reason.
        reason: String,
        /// The receipt of the reverted transaction.
        receipt: Box<TransactionReceipt>,
    },
}
