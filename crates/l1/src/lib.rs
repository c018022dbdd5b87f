//! Interaction with the L1 rollup contract: contract ABI, forced-batch event
//! decoding, and the read/submission surface used by the forced-batch
//! workflow.

pub mod abi;

mod constants;
pub use constants::*;

mod contract;
pub use contract::{L1RollupApi, RollupContract};

mod error;
pub use error::L1Error;

mod event;
pub use event::ForceBatchEvent;
