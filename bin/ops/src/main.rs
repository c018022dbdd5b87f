//! CLI driver for the rollup ops harness: bring the test environment up or
//! down, and run forced-batch vectors against it.

use alloy_primitives::Address;
use alloy_provider::ProviderBuilder;
use alloy_signer_local::PrivateKeySigner;
use clap::{Args, Parser, Subcommand};
use rollup_ops_environment::{
    Component, ComposeSupervisor, Environment, RpcReadiness, Supervisor,
};
use rollup_ops_forced_batch::{ForcedBatchConfig, ForcedBatchWorkflow};
use rollup_ops_l1::RollupContract;
use rollup_ops_primitives::TestVector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ops", about = "Drive the rollup test environment and its verification workflows")]
struct Cli {
    /// The docker compose file describing the environment.
    #[arg(long, env = "OPS_COMPOSE_FILE", default_value = "docker-compose.test.yml")]
    compose_file: String,

    /// The compose project name, isolating concurrent environments.
    #[arg(long, env = "OPS_PROJECT", default_value = "rollup-ops")]
    project: String,

    /// L1 execution node RPC URL.
    #[arg(long, env = "OPS_L1_RPC", default_value = "http://localhost:8545")]
    l1_rpc: String,

    /// Rollup node RPC URL.
    #[arg(long, env = "OPS_L2_RPC", default_value = "http://localhost:8123")]
    l2_rpc: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the environment components and wait until each reports healthy.
    Up,
    /// Tear the environment down, dropping volumes and orphans.
    Down,
    /// Run the forced-batch vectors in a file against the environment.
    ForcedBatch(ForcedBatchArgs),
}

#[derive(Debug, Args)]
struct ForcedBatchArgs {
    /// The test-vector file to run.
    #[arg(long)]
    vector: PathBuf,

    /// The rollup contract address on L1.
    #[arg(long, env = "OPS_ROLLUP_ADDRESS")]
    rollup_address: Address,

    /// The global exit root manager address on L1.
    #[arg(long, env = "OPS_EXIT_ROOT_ADDRESS")]
    exit_root_address: Address,

    /// The private key signing L1 submissions.
    #[arg(long, env = "OPS_L1_PRIVATE_KEY")]
    private_key: String,
}

/// The components of a full rollup test environment, in start order.
fn components(l1_rpc: &str, l2_rpc: &str) -> Vec<Component> {
    vec![
        Component::new("l1").with_readiness(RpcReadiness::new(l1_rpc)),
        Component::new("zkevm-state-db"),
        Component::new("zkevm-prover"),
        Component::new("zkevm-data-availability"),
        Component::new("zkevm-node").with_readiness(RpcReadiness::new(l2_rpc)),
    ]
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let supervisor = ComposeSupervisor::new(&cli.compose_file, &cli.project);

    match &cli.command {
        Command::Up => {
            let environment = Environment::new(supervisor).keep_on_drop();
            environment.start_all(&components(&cli.l1_rpc, &cli.l2_rpc)).await?;
            tracing::info!("environment up");
        }
        Command::Down => {
            supervisor.shutdown()?;
            tracing::info!("environment down");
        }
        Command::ForcedBatch(args) => forced_batch(&cli, args).await?,
    }
    Ok(())
}

async fn forced_batch(cli: &Cli, args: &ForcedBatchArgs) -> eyre::Result<()> {
    let signer: PrivateKeySigner = args.private_key.parse()?;
    let sender = signer.address();

    let l1_provider = ProviderBuilder::new().wallet(signer).connect(&cli.l1_rpc).await?;
    let l2_provider = ProviderBuilder::new().connect(&cli.l2_rpc).await?;

    let contract =
        RollupContract::new(l1_provider, args.rollup_address, args.exit_root_address, sender);
    let workflow = ForcedBatchWorkflow::new(contract, l2_provider, ForcedBatchConfig::default());

    for vector in TestVector::load(&args.vector)? {
        tracing::info!(id = vector.id, description = vector.description.as_deref(), "running vector");
        let outcome = workflow.run(vector.raw_batch(), &vector.expected_new_leaves).await?;
        eyre::ensure!(
            outcome.batch.state_root == vector.expected_new_root,
            "vector {}: state root mismatch: expected {}, got {}",
            vector.id,
            vector.expected_new_root,
            outcome.batch.state_root
        );
        tracing::info!(id = vector.id, batch = %outcome.batch, "vector verified");
    }
    Ok(())
}
