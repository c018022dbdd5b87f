//! The forced-batch submission and verification workflow.
//!
//! A forced batch includes L2 transactions through an L1 transaction,
//! bypassing the off-chain sequencer. The workflow coordinates state across
//! the two independently-progressing ledgers using the on-chain `ForceBatch`
//! event as the synchronization primitive: submit on L1, recover the assigned
//! forced batch number from the logs, wait for the node to close, virtualize
//! and consolidate the resulting batch, then verify the resulting account
//! leaves against the expected post-state.
//!
//! Steps are strictly sequential: each step's postcondition is the next
//! step's precondition. Exactly two conditions retry in place (logs not yet
//! indexed, batch not yet synchronized); every other failure aborts the run.

mod config;
pub use config::ForcedBatchConfig;

mod error;
pub use error::{ForcedBatchError, LeafField};

mod state;
pub use state::StateReader;

use alloy_primitives::{Bytes, TxHash, B256};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt};
use rollup_ops_confirm::{wait_for_confirmation, ConfirmationApi};
use rollup_ops_l1::{ForceBatchEvent, L1RollupApi};
use rollup_ops_poller::{poll_until, PollError};
use rollup_ops_primitives::{BatchRef, ExpectedLeaf};
use rollup_ops_verifier::{
    retryable_cause, wait_batch_closed, wait_batch_consolidated, wait_batch_virtualized,
    Retryable, RollupNodeApi,
};

/// The result of a completed forced-batch run.
#[derive(Debug, Clone)]
pub struct ForcedBatchOutcome {
    /// The verified batch.
    pub batch: BatchRef,
    /// The global exit root the forced batch was registered against.
    pub exit_root: B256,
    /// The receipt of the L1 submission.
    pub receipt: TransactionReceipt,
}

/// Drives forced batches from L1 submission to verified L2 state.
#[derive(Debug)]
pub struct ForcedBatchWorkflow<L1, L2> {
    l1: L1,
    l2: L2,
    config: ForcedBatchConfig,
}

impl<L1, L2> ForcedBatchWorkflow<L1, L2>
where
    L1: L1RollupApi + ConfirmationApi + Sync,
    L2: RollupNodeApi + StateReader + Sync,
{
    /// Returns a new workflow over the given L1 contract surface and rollup
    /// node.
    pub fn new(l1: L1, l2: L2, config: ForcedBatchConfig) -> Self {
        Self { l1, l2, config }
    }

    /// Submits the raw L2 transactions as a forced batch and verifies the
    /// resulting state transition.
    ///
    /// If the contract currently disallows forced batches, exactly one
    /// activation transaction is submitted and confirmed before the forced
    /// batch itself. Expected leaves are checked only after every wait has
    /// succeeded, so a mismatch is a genuine state-transition discrepancy.
    pub async fn run(
        &self,
        transactions: Bytes,
        expected: &[ExpectedLeaf],
    ) -> Result<ForcedBatchOutcome, ForcedBatchError> {
        // Snapshot both ledgers' view of the exit root. They need not match
        // yet: the node may still be catching up on L1.
        let initial_exit_root = self.l1.last_global_exit_root().await?;
        let node_exit_root = self.l2.latest_global_exit_root().await?;
        let initial_virtual_batch = self.l2.virtual_batch_number().await?;
        tracing::info!(
            target: "ops::forced_batch",
            %initial_exit_root,
            %node_exit_root,
            initial_virtual_batch,
            "starting forced batch run"
        );

        self.ensure_forced_batches_allowed().await?;

        // The scan window starts at the block recorded just before
        // submission.
        let scan_from = self.l1.block_number().await?;
        let tx = self.l1.submit_force_batch(transactions, self.config.fee).await?;
        let receipt = wait_for_confirmation(&self.l1, &tx, self.config.confirm_deadline).await?;
        tracing::info!(target: "ops::forced_batch", hash = %receipt.transaction_hash, "forced batch submission confirmed");

        let event = self.scan_for_event(scan_from, tx.hash).await?;
        tracing::info!(
            target: "ops::forced_batch",
            forced_batch_number = event.forced_batch_number,
            exit_root = %event.global_exit_root,
            "forced batch assigned"
        );

        let batch_number = self.resolve_batch(event.forced_batch_number).await?;

        wait_batch_closed(&self.l2, batch_number, self.config.spec(self.config.closed_deadline))
            .await?;
        wait_batch_virtualized(
            &self.l2,
            batch_number,
            self.config.spec(self.config.virtualized_deadline),
        )
        .await?;
        wait_batch_consolidated(
            &self.l2,
            batch_number,
            self.config.spec(self.config.consolidated_deadline),
        )
        .await?;

        // Re-read the batch now that it is closed: only the closed batch
        // carries the final state root and block set.
        let batch = self
            .l2
            .batch_by_number(batch_number)
            .await?
            .ok_or(ForcedBatchError::BatchVanished(batch_number))?;

        // If the submission moved the exit root on L1, the node must have
        // observed the same value. Anything else is silent desynchronization
        // between the two ledgers.
        let final_exit_root = self.l1.last_global_exit_root().await?;
        if final_exit_root != initial_exit_root {
            let node_root = self.l2.latest_global_exit_root().await?;
            if node_root != final_exit_root {
                return Err(ForcedBatchError::ExitRootMismatch {
                    onchain: final_exit_root,
                    node: node_root,
                });
            }
        }

        let (first_hash, last_hash) = match (batch.blocks.first(), batch.blocks.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(ForcedBatchError::EmptyBatch(batch_number)),
        };

        let pin = BlockId::hash(last_hash);
        for leaf in expected {
            state::verify_leaf(&self.l2, pin, leaf).await?;
        }

        let first_block = self.block_number(first_hash).await?;
        let last_block =
            if first_hash == last_hash { first_block } else { self.block_number(last_hash).await? };

        let batch = BatchRef {
            number: batch_number,
            forced_batch_number: Some(event.forced_batch_number),
            state_root: batch.state_root,
            first_block,
            last_block,
        };
        tracing::info!(target: "ops::forced_batch", %batch, "forced batch verified");
        Ok(ForcedBatchOutcome { batch, exit_root: event.global_exit_root, receipt })
    }

    /// Submits the activation transaction when the contract disallows forced
    /// batches, and blocks until its receipt shows success.
    async fn ensure_forced_batches_allowed(&self) -> Result<(), ForcedBatchError> {
        if !self.l1.forced_batches_disallowed().await? {
            return Ok(());
        }

        tracing::info!(target: "ops::forced_batch", "forced batches disallowed, activating");
        let tx = self.l1.submit_activate_forced_batches().await?;
        let receipt = wait_for_confirmation(&self.l1, &tx, self.config.confirm_deadline).await?;
        tracing::debug!(target: "ops::forced_batch", hash = %receipt.transaction_hash, "forced batches activated");
        Ok(())
    }

    /// Polls the L1 logs until the submission's `ForceBatch` event appears.
    ///
    /// Logs may lag the mined block, so the scan is a polling loop over the
    /// filter query, bounded by the scan deadline rather than left unbounded.
    async fn scan_for_event(
        &self,
        from_block: u64,
        submission: TxHash,
    ) -> Result<ForceBatchEvent, ForcedBatchError> {
        poll_until(self.config.spec(self.config.scan_deadline), || async move {
            let events = self.l1.force_batch_events(from_block).await?;
            Ok(events.into_iter().find(|event| event.transaction_hash == Some(submission)))
        })
        .await
        .map_err(|err: PollError<rollup_ops_l1::L1Error>| match err {
            PollError::Timeout(source) => ForcedBatchError::RetryTimeout {
                waiting_on: Retryable::LogNotIndexed,
                source,
            },
            PollError::Probe(err) => err.into(),
        })
    }

    /// Resolves the node batch created for the forced batch number.
    ///
    /// A node that has not synchronized the forced batch yet answers with a
    /// retryable error and is polled again; any other error is fatal.
    async fn resolve_batch(&self, forced_number: u64) -> Result<u64, ForcedBatchError> {
        let batch = poll_until(self.config.spec(self.config.closed_deadline), || async move {
            match self.l2.batch_by_forced_number(forced_number).await {
                Ok(batch) => Ok(batch),
                Err(err)
                    if retryable_cause(&err) == Some(Retryable::BatchNotSynchronized) =>
                {
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        })
        .await
        .map_err(|err| match err {
            PollError::Timeout(source) => ForcedBatchError::RetryTimeout {
                waiting_on: Retryable::BatchNotSynchronized,
                source,
            },
            PollError::Probe(err) => ForcedBatchError::Rpc(err),
        })?;

        let number = batch.number.to::<u64>();
        tracing::debug!(target: "ops::forced_batch", forced_number, batch = number, "forced batch resolved");
        Ok(number)
    }

    /// Resolves an L2 block hash to its number.
    async fn block_number(&self, hash: B256) -> Result<u64, ForcedBatchError> {
        self.l2.block_number_by_hash(hash).await?.ok_or(ForcedBatchError::UnknownBlock(hash))
    }
}
