//! ABI types for the L1 rollup and exit-root contracts.

pub mod calls;
pub mod logs;
