//! Forced-batch e2e: submits a transfer through L1 and verifies the resulting
//! state transition end to end.

use eyre::Result;
use rollup_ops_forced_batch::{ForcedBatchConfig, ForcedBatchWorkflow};
use rollup_ops_l1::{L1RollupApi, RollupContract};
use rollup_ops_primitives::TestVector;
use rollup_ops_verifier::RollupNodeApi;
use tests::{
    init_test_tracing, l1_wallet_provider, l2_provider, rollup_environment,
    EXIT_ROOT_MANAGER_ADDR, ROLLUP_CONTRACT_ADDR,
};

#[tokio::test]
#[ignore = "requires the docker environment"]
async fn forced_transfer_batch_end_to_end() -> Result<()> {
    init_test_tracing();
    let (env, components) = rollup_environment("forced-batch");
    env.start_all(&components).await?;

    let vectors = TestVector::load("vectors/forced-transfer.json")?;
    let vector = &vectors[0];

    let l2 = l2_provider().await?;
    let initial_virtual_batch = l2.virtual_batch_number().await?;

    let (l1, sender) = l1_wallet_provider().await?;
    let contract = RollupContract::new(l1, ROLLUP_CONTRACT_ADDR, EXIT_ROOT_MANAGER_ADDR, sender);
    let workflow = ForcedBatchWorkflow::new(contract, l2, ForcedBatchConfig::default());

    let outcome = workflow.run(vector.raw_batch(), &vector.expected_new_leaves).await?;

    // the forced batch lands strictly after everything that was already
    // virtualized before submission.
    assert!(outcome.batch.number > initial_virtual_batch);
    assert_eq!(outcome.batch.state_root, vector.expected_new_root);
    assert!(outcome.batch.forced_batch_number.is_some());

    // the scan is a pure read: a fresh scan over the same window recovers the
    // same assignment.
    let (l1, sender) = l1_wallet_provider().await?;
    let contract = RollupContract::new(l1, ROLLUP_CONTRACT_ADDR, EXIT_ROOT_MANAGER_ADDR, sender);
    let first = contract.force_batch_events(0).await?;
    let second = contract.force_batch_events(0).await?;
    assert_eq!(first, second);
    assert!(first
        .iter()
        .any(|event| Some(event.forced_batch_number) == outcome.batch.forced_batch_number));
    Ok(())
}
