//! Shared helpers for the e2e suite.
//!
//! Every test here drives a real docker-compose environment: an L1 devnet
//! node, the rollup node, its prover and the data-availability service. The
//! environment is brought up per test under a unique compose project name and
//! torn down when the controller drops.

use alloy_network::TransactionBuilder;
use alloy_primitives::{address, Address, Bytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use eyre::Result;
use rollup_ops_environment::{Component, ComposeSupervisor, Environment, RpcReadiness};
use rollup_ops_primitives::SubmittedTx;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

/// L1 node RPC URL for docker tests.
pub const L1_RPC_URL: &str = "http://localhost:8545";

/// Rollup node RPC URL for docker tests.
pub const L2_RPC_URL: &str = "http://localhost:8123";

/// Chain id of the local L1 devnet.
pub const L1_CHAIN_ID: u64 = 1337;

/// Chain id of the local rollup.
pub const L2_CHAIN_ID: u64 = 1001;

/// The funded deployer account (first devnet account).
pub const DEPLOYER_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The rollup contract proxy address on the local L1.
pub const ROLLUP_CONTRACT_ADDR: Address = address!("8A791620dd6260079BF849Dc5567aDC3F2FdC318");

/// The global exit root manager proxy address on the local L1.
pub const EXIT_ROOT_MANAGER_ADDR: Address = address!("Dc64a140Aa3E981100a9becA4E685f962f0cF6C9");

/// Initializes test tracing from `RUST_LOG`, defaulting to info.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// Returns the environment controller and the standard component set, scoped
/// to a unique compose project so concurrent test runs do not collide.
pub fn rollup_environment(test_name: &str) -> (Environment, Vec<Component>) {
    let timestamp =
        SystemTime::now().duration_since(UNIX_EPOCH).expect("time went backwards").as_secs();
    let supervisor =
        ComposeSupervisor::new("docker-compose.test.yml", format!("test-{test_name}-{timestamp}"));

    let components = vec![
        Component::new("l1")
            .with_readiness(RpcReadiness::new(L1_RPC_URL).with_chain_id(L1_CHAIN_ID)),
        Component::new("zkevm-state-db"),
        Component::new("zkevm-prover"),
        Component::new("zkevm-data-availability"),
        Component::new("zkevm-node")
            .with_readiness(RpcReadiness::new(L2_RPC_URL).with_chain_id(L2_CHAIN_ID)),
    ];

    (Environment::new(supervisor), components)
}

/// Returns an L1 provider carrying the deployer wallet, plus its address.
pub async fn l1_wallet_provider() -> Result<(impl Provider, Address)> {
    wallet_provider(L1_RPC_URL).await
}

/// Returns an L2 provider carrying the deployer wallet, plus its address.
pub async fn l2_wallet_provider() -> Result<(impl Provider, Address)> {
    wallet_provider(L2_RPC_URL).await
}

/// Returns a plain read-only L2 provider.
pub async fn l2_provider() -> Result<impl Provider> {
    Ok(ProviderBuilder::new().connect(L2_RPC_URL).await?)
}

async fn wallet_provider(url: &str) -> Result<(impl Provider, Address)> {
    let signer: PrivateKeySigner = DEPLOYER_PRIVATE_KEY.parse()?;
    let sender = signer.address();
    let provider = ProviderBuilder::new().wallet(signer).connect(url).await?;
    Ok((provider, sender))
}

/// Builds, signs and sends a plain transfer, returning the submission handle
/// the confirmation tracker consumes. Nonce selection stays with the caller's
/// account; the tracker itself never touches nonces.
pub async fn send_transfer(
    provider: &impl Provider,
    from: Address,
    to: Address,
    value: U256,
) -> Result<SubmittedTx> {
    let nonce = provider.get_transaction_count(from).await?;
    let gas_price: u128 = 1_000_000_000;

    let request = TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(value)
        .with_gas_limit(21_000)
        .with_gas_price(gas_price)
        .with_nonce(nonce);
    let pending = provider.send_transaction(request).await?;

    Ok(SubmittedTx {
        hash: *pending.tx_hash(),
        from,
        to: Some(to),
        value,
        input: Bytes::new(),
        gas: 21_000,
        gas_price,
        nonce,
    })
}
