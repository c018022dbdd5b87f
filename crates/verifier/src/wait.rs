use crate::{RollupNodeApi, VerifierError};
use alloy_transport::TransportResult;
use rollup_ops_poller::{poll, PollError, PollSpec};
use std::future::Future;

/// Waits until the L2 block is part of an L1-submitted sequence.
pub async fn wait_block_virtualized<A>(
    api: &A,
    block: u64,
    spec: PollSpec,
) -> Result<(), VerifierError>
where
    A: RollupNodeApi + Sync + ?Sized,
{
    tracing::debug!(target: "ops::verifier", block, "waiting for block virtualization");
    wait(spec, || api.is_block_virtualized(block)).await
}

/// Waits until the L2 block's containing batch has its proof verified on L1.
pub async fn wait_block_consolidated<A>(
    api: &A,
    block: u64,
    spec: PollSpec,
) -> Result<(), VerifierError>
where
    A: RollupNodeApi + Sync + ?Sized,
{
    tracing::debug!(target: "ops::verifier", block, "waiting for block consolidation");
    wait(spec, || api.is_block_consolidated(block)).await
}

/// Waits until the node reports the batch closed.
pub async fn wait_batch_closed<A>(api: &A, batch: u64, spec: PollSpec) -> Result<(), VerifierError>
where
    A: RollupNodeApi + Sync + ?Sized,
{
    tracing::debug!(target: "ops::verifier", batch, "waiting for batch closure");
    wait(spec, || async move {
        Ok(api.batch_by_number(batch).await?.is_some_and(|batch| batch.closed))
    })
    .await
}

/// Waits until the batch is part of an L1-submitted sequence.
pub async fn wait_batch_virtualized<A>(
    api: &A,
    batch: u64,
    spec: PollSpec,
) -> Result<(), VerifierError>
where
    A: RollupNodeApi + Sync + ?Sized,
{
    tracing::debug!(target: "ops::verifier", batch, "waiting for batch virtualization");
    wait(spec, || async move { Ok(api.virtual_batch_number().await? >= batch) }).await
}

/// Waits until the batch's proof has been verified on L1.
pub async fn wait_batch_consolidated<A>(
    api: &A,
    batch: u64,
    spec: PollSpec,
) -> Result<(), VerifierError>
where
    A: RollupNodeApi + Sync + ?Sized,
{
    tracing::debug!(target: "ops::verifier", batch, "waiting for batch consolidation");
    wait(spec, || async move { Ok(api.verified_batch_number().await? >= batch) }).await
}

/// Wires a boolean introspection probe into the poller, keeping the error
/// split: a timeout is a timeout, an RPC failure aborts immediately.
async fn wait<F, Fut>(spec: PollSpec, probe: F) -> Result<(), VerifierError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TransportResult<bool>>,
{
    poll(spec, probe).await.map_err(|err| match err {
        PollError::Timeout(timeout) => VerifierError::Timeout(timeout),
        PollError::Probe(err) => VerifierError::Rpc(err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RpcBatch;
    use alloy_primitives::{Address, B256, U64};
    use alloy_transport::TransportErrorKind;
    use std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    };

    /// A node whose counters advance by one on every introspection call.
    #[derive(Default)]
    struct AdvancingNode {
        virtual_batch: AtomicU64,
        verified_batch: AtomicU64,
        closes_batch_at: u64,
        calls: AtomicU64,
        fail_rpc: bool,
    }

    impl AdvancingNode {
        fn batch(number: u64, closed: bool) -> RpcBatch {
            RpcBatch {
                number: U64::from(number),
                coinbase: Address::repeat_byte(0x01),
                state_root: B256::repeat_byte(0x02),
                global_exit_root: B256::repeat_byte(0x03),
                timestamp: U64::from(1_000_000),
                closed,
                send_sequences_tx_hash: None,
                verify_batch_tx_hash: None,
                blocks: vec![B256::repeat_byte(0x04)],
                forced_batch_number: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl RollupNodeApi for AdvancingNode {
        async fn is_block_virtualized(&self, _block: u64) -> TransportResult<bool> {
            if self.fail_rpc {
                return Err(TransportErrorKind::custom_str("boom"));
            }
            Ok(self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= 3)
        }

        async fn is_block_consolidated(&self, _block: u64) -> TransportResult<bool> {
            unimplemented!("not exercised")
        }

        async fn batch_number_by_block(&self, _block: u64) -> TransportResult<u64> {
            unimplemented!("not exercised")
        }

        async fn virtual_batch_number(&self) -> TransportResult<u64> {
            Ok(self.virtual_batch.fetch_add(1, Ordering::SeqCst))
        }

        async fn verified_batch_number(&self) -> TransportResult<u64> {
            Ok(self.verified_batch.fetch_add(1, Ordering::SeqCst))
        }

        async fn batch_by_number(&self, number: u64) -> TransportResult<Option<RpcBatch>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < 2 {
                // batch unknown on the first tick, open on the second.
                return Ok(None);
            }
            Ok(Some(Self::batch(number, call >= self.closes_batch_at)))
        }

        async fn batch_by_forced_number(&self, _number: u64) -> TransportResult<Option<RpcBatch>> {
            unimplemented!("not exercised")
        }

        async fn latest_global_exit_root(&self) -> TransportResult<B256> {
            unimplemented!("not exercised")
        }
    }

    const SPEC: PollSpec = PollSpec::new(Duration::from_secs(1), Duration::from_secs(30));

    #[tokio::test(start_paused = true)]
    async fn block_virtualization_flips_after_polling() -> eyre::Result<()> {
        let node = AdvancingNode::default();
        wait_block_virtualized(&node, 7, SPEC).await?;
        assert_eq!(node.calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rpc_error_aborts_the_wait() {
        let node = AdvancingNode { fail_rpc: true, ..Default::default() };
        let err = wait_block_virtualized(&node, 7, SPEC).await.unwrap_err();
        assert!(matches!(err, VerifierError::Rpc(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn batch_closure_tolerates_unknown_batches() -> eyre::Result<()> {
        let node = AdvancingNode { closes_batch_at: 4, ..Default::default() };
        wait_batch_closed(&node, 12, SPEC).await?;
        assert_eq!(node.calls.load(Ordering::SeqCst), 4);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn batch_virtualization_compares_against_the_tip() -> eyre::Result<()> {
        let node = AdvancingNode::default();
        // virtual batch number advances 0, 1, 2, ... per poll.
        wait_batch_virtualized(&node, 5, SPEC).await?;
        assert_eq!(node.virtual_batch.load(Ordering::SeqCst), 6);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn never_consolidating_batch_times_out() {
        let node = AdvancingNode::default();
        let spec = PollSpec::new(Duration::from_secs(1), Duration::from_secs(3));
        let err = wait_batch_consolidated(&node, 1_000_000, spec).await.unwrap_err();
        assert!(matches!(err, VerifierError::Timeout(_)));
    }
}
