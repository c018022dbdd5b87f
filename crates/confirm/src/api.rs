use alloy_primitives::{Bytes, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_transport::TransportResult;
use rollup_ops_primitives::SubmittedTx;

/// The node surface the confirmation tracker polls.
///
/// Blanket-implemented for any provider; narrow so the tracker's state
/// machine can be exercised against a scripted mock.
#[async_trait::async_trait]
pub trait ConfirmationApi {
    /// Returns the receipt for the transaction, or `None` while the node
    /// reports it pending or does not know it yet.
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> TransportResult<Option<TransactionReceipt>>;

    /// Replays the transaction's call parameters read-only through the
    /// call-simulation RPC, pinned at the given block.
    async fn replay(&self, tx: &SubmittedTx, block: u64) -> TransportResult<Bytes>;
}

#[async_trait::async_trait]
impl<P: Provider> ConfirmationApi for P {
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> TransportResult<Option<TransactionReceipt>> {
        self.get_transaction_receipt(hash).await
    }

    async fn replay(&self, tx: &SubmittedTx, block: u64) -> TransportResult<Bytes> {
        self.call(tx.to_call_request()).block(block.into()).await
    }
}
