use alloy_primitives::B256;
use std::fmt::{Display, Formatter};

/// A reference to a rollup batch recovered from a forced-batch submission.
///
/// Created once the forced-batch event has been observed on L1 and the node
/// has resolved the batch assigned to it. The harness never writes to the
/// underlying batch: it only re-reads it until closure, virtualization and
/// consolidation have all been observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRef {
    /// The batch number assigned by the node.
    pub number: u64,
    /// The forced batch number assigned by the L1 contract, if the batch was
    /// forced.
    pub forced_batch_number: Option<u64>,
    /// The state root the batch settles on.
    pub state_root: B256,
    /// The first L2 block contained in the batch.
    pub first_block: u64,
    /// The last L2 block contained in the batch.
    pub last_block: u64,
}

impl Display for BatchRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BatchRef {{ number: {}, forced: {:?}, blocks: {}..={}, state_root: {} }}",
            self.number, self.forced_batch_number, self.first_block, self.last_block, self.state_root
        )
    }
}
