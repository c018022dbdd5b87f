//! Shared types for the rollup ops harness.

mod batch;
pub use batch::BatchRef;

mod leaf;
pub use leaf::ExpectedLeaf;

mod tx;
pub use tx::SubmittedTx;

mod vector;
pub use vector::{GenesisAccount, TestVector, VectorError, VectorTransaction};
