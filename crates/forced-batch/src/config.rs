use alloy_primitives::U256;
use rollup_ops_poller::PollSpec;
use std::time::Duration;

/// Per-stage budgets for a forced-batch run.
///
/// Every stage is bounded, including the L1 log scan: an unbounded scan hangs
/// forever against a node that never indexes the submission block.
/// Consolidation gets the largest budget since it waits on proof generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedBatchConfig {
    /// The fee attached to the forced-batch submission.
    pub fee: U256,
    /// The tick shared by every polling stage.
    pub poll_interval: Duration,
    /// Deadline for L1 transaction confirmations.
    pub confirm_deadline: Duration,
    /// Deadline for the forced-batch event to appear in the L1 logs.
    pub scan_deadline: Duration,
    /// Deadline for the node to resolve and close the forced batch.
    pub closed_deadline: Duration,
    /// Deadline for the batch to become part of an L1-submitted sequence.
    pub virtualized_deadline: Duration,
    /// Deadline for the batch proof to be verified on L1.
    pub consolidated_deadline: Duration,
}

impl Default for ForcedBatchConfig {
    fn default() -> Self {
        Self {
            fee: U256::from(10).pow(U256::from(18)),
            poll_interval: Duration::from_secs(1),
            confirm_deadline: Duration::from_secs(60),
            scan_deadline: Duration::from_secs(30),
            closed_deadline: Duration::from_secs(60),
            virtualized_deadline: Duration::from_secs(120),
            consolidated_deadline: Duration::from_secs(300),
        }
    }
}

impl ForcedBatchConfig {
    /// A poll over the shared tick, bounded at the given deadline.
    pub(crate) const fn spec(&self, deadline: Duration) -> PollSpec {
        PollSpec::new(self.poll_interval, deadline)
    }
}
