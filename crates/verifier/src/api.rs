use crate::RpcBatch;
use alloy_primitives::{B256, U64};
use alloy_provider::Provider;
use alloy_transport::TransportResult;

/// The node's rollup introspection surface.
///
/// Blanket-implemented for any provider through raw client requests against
/// the `zkevm` RPC namespace; narrow so waits can run against scripted mocks.
#[async_trait::async_trait]
pub trait RollupNodeApi {
    /// Returns whether the L2 block is part of an L1-submitted sequence.
    async fn is_block_virtualized(&self, block: u64) -> TransportResult<bool>;

    /// Returns whether the L2 block belongs to a batch whose proof has been
    /// verified on L1.
    async fn is_block_consolidated(&self, block: u64) -> TransportResult<bool>;

    /// Returns the number of the batch containing the L2 block.
    async fn batch_number_by_block(&self, block: u64) -> TransportResult<u64>;

    /// Returns the highest virtualized batch number.
    async fn virtual_batch_number(&self) -> TransportResult<u64>;

    /// Returns the highest consolidated batch number.
    async fn verified_batch_number(&self) -> TransportResult<u64>;

    /// Returns the batch with the given number, or `None` if the node does
    /// not know it yet.
    async fn batch_by_number(&self, number: u64) -> TransportResult<Option<RpcBatch>>;

    /// Returns the batch created for the given forced batch number, or `None`
    /// if the node has not associated one yet.
    async fn batch_by_forced_number(&self, number: u64) -> TransportResult<Option<RpcBatch>>;

    /// Returns the node's view of the latest global exit root.
    async fn latest_global_exit_root(&self) -> TransportResult<B256>;
}

#[async_trait::async_trait]
impl<P: Provider> RollupNodeApi for P {
    async fn is_block_virtualized(&self, block: u64) -> TransportResult<bool> {
        self.client().request("zkevm_isBlockVirtualized", (U64::from(block),)).await
    }

    async fn is_block_consolidated(&self, block: u64) -> TransportResult<bool> {
        self.client().request("zkevm_isBlockConsolidated", (U64::from(block),)).await
    }

    async fn batch_number_by_block(&self, block: u64) -> TransportResult<u64> {
        let number: U64 =
            self.client().request("zkevm_batchNumberByBlockNumber", (U64::from(block),)).await?;
        Ok(number.to::<u64>())
    }

    async fn virtual_batch_number(&self) -> TransportResult<u64> {
        let number: U64 = self.client().request("zkevm_virtualBatchNumber", ()).await?;
        Ok(number.to::<u64>())
    }

    async fn verified_batch_number(&self) -> TransportResult<u64> {
        let number: U64 = self.client().request("zkevm_verifiedBatchNumber", ()).await?;
        Ok(number.to::<u64>())
    }

    async fn batch_by_number(&self, number: u64) -> TransportResult<Option<RpcBatch>> {
        self.client().request("zkevm_getBatchByNumber", (U64::from(number), false)).await
    }

    async fn batch_by_forced_number(&self, number: u64) -> TransportResult<Option<RpcBatch>> {
        self.client().request("zkevm_getBatchByForcedBatchNumber", (U64::from(number),)).await
    }

    async fn latest_global_exit_root(&self) -> TransportResult<B256> {
        self.client().request("zkevm_getLatestGlobalExitRoot", ()).await
    }
}
