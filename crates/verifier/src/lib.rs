//! Cross-layer state verification for the rollup node.
//!
//! The node exposes introspection RPCs describing how far each L2 block and
//! batch has progressed on L1: *virtualized* once it is part of an
//! L1-submitted sequence, *consolidated* once its proof has been verified.
//! There is no subscription primitive for either transition, only the
//! guarantee that they eventually become true, so every wait here is a probe
//! wired into the condition poller. An RPC error is a real failure and aborts
//! the wait; a `false` business answer keeps polling.

mod api;
pub use api::RollupNodeApi;

mod batch;
pub use batch::RpcBatch;

mod error;
pub use error::{retryable_cause, Retryable, VerifierError};

mod wait;
pub use wait::{
    wait_batch_closed, wait_batch_consolidated, wait_batch_virtualized, wait_block_consolidated,
    wait_block_virtualized,
};
