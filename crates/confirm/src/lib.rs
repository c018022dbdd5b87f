//! Transaction confirmation tracking.
//!
//! A submitted transaction terminates in exactly one of three states:
//! mined-success, mined-reverted, or timeout. While the node reports the
//! transaction pending or not yet found, the tracker keeps polling: not-found
//! is expected propagation lag, never a failure. Once a receipt is available
//! its status decides the outcome, and a reverted transaction is replayed
//! read-only at its inclusion block to recover the revert reason the receipt
//! does not carry.

mod api;
pub use api::ConfirmationApi;

mod error;
pub use error::ConfirmError;

use alloy_primitives::hex;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::{Revert, SolError};
use rollup_ops_poller::{poll_until, PollError, PollSpec};
use rollup_ops_primitives::SubmittedTx;
use std::time::Duration;

/// The receipt polling interval.
pub const DEFAULT_CONFIRM_INTERVAL: Duration = Duration::from_secs(1);

/// Waits until the transaction is mined, then classifies the outcome.
///
/// Returns the receipt on success. A mined-but-reverted transaction surfaces
/// as [`ConfirmError::TransactionFailed`] carrying the recovered revert
/// reason; a transaction still unmined at the deadline surfaces as
/// [`ConfirmError::Timeout`].
pub async fn wait_for_confirmation<A>(
    api: &A,
    tx: &SubmittedTx,
    deadline: Duration,
) -> Result<TransactionReceipt, ConfirmError>
where
    A: ConfirmationApi + Sync + ?Sized,
{
    let spec = PollSpec::new(DEFAULT_CONFIRM_INTERVAL, deadline);
    let receipt =
        poll_until(spec, || api.transaction_receipt(tx.hash)).await.map_err(|err| match err {
            PollError::Timeout(timeout) => ConfirmError::Timeout(timeout),
            PollError::Probe(err) => ConfirmError::Rpc(err),
        })?;

    if receipt.status() {
        tracing::debug!(target: "ops::confirm", hash = %receipt.transaction_hash, "transaction confirmed");
        return Ok(receipt);
    }

    let reason = revert_reason(api, tx, &receipt).await;
    tracing::warn!(target: "ops::confirm", hash = %receipt.transaction_hash, reason, "transaction reverted");
    Err(ConfirmError::TransactionFailed { reason, receipt: Box::new(receipt) })
}

/// Recovers the revert reason of a mined-but-reverted transaction.
///
/// The chain only persists a boolean failure flag; the revert string is
/// emitted transiently during execution. Re-executing the same call pinned at
/// the inclusion block reproduces the revert payload, which is then ABI
/// decoded (4-byte selector, offset, UTF-8 reason). If the replay itself
/// errors the error text is used; if the payload does not decode, its hex
/// rendering is.
async fn revert_reason<A>(api: &A, tx: &SubmittedTx, receipt: &TransactionReceipt) -> String
where
    A: ConfirmationApi + Sync + ?Sized,
{
    let block = receipt.block_number.unwrap_or_default();
    match api.replay(tx, block).await {
        Ok(output) => Revert::abi_decode(&output)
            .map(|revert| revert.reason)
            .unwrap_or_else(|_| hex::encode_prefixed(&output)),
        Err(err) => err.to_string(),
    }
}
