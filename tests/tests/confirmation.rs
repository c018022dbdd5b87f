//! Confirmation tracking against the live environment.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use eyre::Result;
use rollup_ops_confirm::{wait_for_confirmation, ConfirmError};
use rollup_ops_primitives::SubmittedTx;
use std::time::Duration;
use tests::{init_test_tracing, l2_wallet_provider, rollup_environment, send_transfer};

#[tokio::test]
#[ignore = "requires the docker environment"]
async fn transfer_is_confirmed() -> Result<()> {
    init_test_tracing();
    let (env, components) = rollup_environment("confirm-transfer");
    env.start_all(&components).await?;

    let (provider, sender) = l2_wallet_provider().await?;
    let recipient = Address::repeat_byte(0x42);
    let tx = send_transfer(&provider, sender, recipient, U256::from(10_000)).await?;

    let receipt = wait_for_confirmation(&provider, &tx, Duration::from_secs(60)).await?;
    assert!(receipt.status());
    assert_eq!(provider.get_balance(recipient).await?, U256::from(10_000));
    Ok(())
}

#[tokio::test]
#[ignore = "requires the docker environment"]
async fn unbroadcast_transaction_times_out() -> Result<()> {
    init_test_tracing();
    let (env, components) = rollup_environment("confirm-timeout");
    env.start_all(&components).await?;

    let (provider, sender) = l2_wallet_provider().await?;

    // A hash no node has ever seen: the tracker must keep treating not-found
    // as pending until the deadline, then time out rather than error.
    let tx = SubmittedTx {
        hash: TxHash::repeat_byte(0xde),
        from: sender,
        to: None,
        value: U256::ZERO,
        input: Bytes::new(),
        gas: 21_000,
        gas_price: 1_000_000_000,
        nonce: 0,
    };

    let err = wait_for_confirmation(&provider, &tx, Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, ConfirmError::Timeout(_)));
    Ok(())
}
