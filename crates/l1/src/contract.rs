use crate::{
    abi::{
        calls::{
            activateForceBatchesCall, forceBatchCall, getLastGlobalExitRootCall,
            isForcedBatchDisallowedCall, lastForceBatchCall,
        },
        logs::ForceBatch,
    },
    ForceBatchEvent, L1Error, DEFAULT_SUBMISSION_GAS_LIMIT, DEFAULT_SUBMISSION_GAS_PRICE,
};
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, TransactionReceipt, TransactionRequest};
use alloy_sol_types::{SolCall, SolEvent};
use alloy_transport::TransportResult;
use rollup_ops_confirm::ConfirmationApi;
use rollup_ops_primitives::SubmittedTx;

/// Read and submission access to the L1 rollup contract.
///
/// Submissions return a [`SubmittedTx`] handle only: confirmation is the
/// caller's concern, so the submitter never blocks on inclusion.
#[async_trait::async_trait]
pub trait L1RollupApi {
    /// Returns the current L1 block number.
    async fn block_number(&self) -> Result<u64, L1Error>;

    /// Returns whether forced batches are currently disallowed by the rollup
    /// contract.
    async fn forced_batches_disallowed(&self) -> Result<bool, L1Error>;

    /// Returns the last global exit root finalized on L1.
    async fn last_global_exit_root(&self) -> Result<B256, L1Error>;

    /// Returns the number of the last forced batch registered on the
    /// contract.
    async fn last_force_batch(&self) -> Result<u64, L1Error>;

    /// Submits a forced batch carrying the raw L2 transactions and the fee.
    async fn submit_force_batch(
        &self,
        transactions: Bytes,
        fee: U256,
    ) -> Result<SubmittedTx, L1Error>;

    /// Submits the transaction enabling forced batches on the contract.
    async fn submit_activate_forced_batches(&self) -> Result<SubmittedTx, L1Error>;

    /// Queries the `ForceBatch` events emitted from `from_block` onwards.
    ///
    /// A single bounded log query. Logs may not be indexed immediately after
    /// the submission block is mined, so callers own the retry policy.
    async fn force_batch_events(&self, from_block: u64) -> Result<Vec<ForceBatchEvent>, L1Error>;
}

/// The L1 rollup contract bound to a provider and a sender account.
#[derive(Debug)]
pub struct RollupContract<P> {
    /// The L1 execution node provider. Submissions require the provider to
    /// carry a wallet for the sender account.
    provider: P,
    /// The rollup contract address.
    rollup_address: Address,
    /// The global exit root manager contract address.
    exit_root_manager: Address,
    /// The account submissions are sent from.
    sender: Address,
    /// The gas limit attached to submissions.
    gas_limit: u64,
    /// The gas price attached to submissions.
    gas_price: u128,
}

impl<P: Provider> RollupContract<P> {
    /// Returns a new [`RollupContract`] with default submission gas settings.
    pub fn new(
        provider: P,
        rollup_address: Address,
        exit_root_manager: Address,
        sender: Address,
    ) -> Self {
        Self {
            provider,
            rollup_address,
            exit_root_manager,
            sender,
            gas_limit: DEFAULT_SUBMISSION_GAS_LIMIT,
            gas_price: DEFAULT_SUBMISSION_GAS_PRICE,
        }
    }

    /// Overrides the gas settings attached to submissions.
    pub fn with_gas(mut self, gas_limit: u64, gas_price: u128) -> Self {
        self.gas_limit = gas_limit;
        self.gas_price = gas_price;
        self
    }

    /// Issues a read-only call against `to`.
    async fn read(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, L1Error> {
        let request = TransactionRequest::default().with_to(to).with_input(calldata);
        Ok(self.provider.call(request).await?)
    }

    /// Signs and sends a submission to the rollup contract, returning the
    /// handle with the exact parameters the transaction was signed with.
    async fn submit(&self, calldata: Vec<u8>) -> Result<SubmittedTx, L1Error> {
        let nonce = self.provider.get_transaction_count(self.sender).await?;
        let input: Bytes = calldata.into();
        let request = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(self.rollup_address)
            .with_input(input.clone())
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_nonce(nonce);

        let pending = self.provider.send_transaction(request).await?;
        let hash = *pending.tx_hash();
        tracing::debug!(target: "ops::l1", %hash, nonce, "submitted L1 transaction");

        Ok(SubmittedTx {
            hash,
            from: self.sender,
            to: Some(self.rollup_address),
            value: U256::ZERO,
            input,
            gas: self.gas_limit,
            gas_price: self.gas_price,
            nonce,
        })
    }
}

#[async_trait::async_trait]
impl<P: Provider> L1RollupApi for RollupContract<P> {
    async fn block_number(&self) -> Result<u64, L1Error> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn forced_batches_disallowed(&self) -> Result<bool, L1Error> {
        let output =
            self.read(self.rollup_address, isForcedBatchDisallowedCall {}.abi_encode()).await?;
        Ok(isForcedBatchDisallowedCall::abi_decode_returns(&output)?)
    }

    async fn last_global_exit_root(&self) -> Result<B256, L1Error> {
        let output =
            self.read(self.exit_root_manager, getLastGlobalExitRootCall {}.abi_encode()).await?;
        Ok(getLastGlobalExitRootCall::abi_decode_returns(&output)?)
    }

    async fn last_force_batch(&self) -> Result<u64, L1Error> {
        let output = self.read(self.rollup_address, lastForceBatchCall {}.abi_encode()).await?;
        Ok(lastForceBatchCall::abi_decode_returns(&output)?)
    }

    async fn submit_force_batch(
        &self,
        transactions: Bytes,
        fee: U256,
    ) -> Result<SubmittedTx, L1Error> {
        let call = forceBatchCall { transactions, maticAmount: fee };
        self.submit(call.abi_encode()).await
    }

    async fn submit_activate_forced_batches(&self) -> Result<SubmittedTx, L1Error> {
        self.submit(activateForceBatchesCall {}.abi_encode()).await
    }

    async fn force_batch_events(&self, from_block: u64) -> Result<Vec<ForceBatchEvent>, L1Error> {
        let filter = Filter::new()
            .address(self.rollup_address)
            .event_signature(ForceBatch::SIGNATURE_HASH)
            .from_block(from_block);
        let logs = self.provider.get_logs(&filter).await?;
        logs.iter().map(ForceBatchEvent::try_from).collect()
    }
}

#[async_trait::async_trait]
impl<P: Provider> ConfirmationApi for RollupContract<P> {
    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> TransportResult<Option<TransactionReceipt>> {
        self.provider.get_transaction_receipt(hash).await
    }

    async fn replay(&self, tx: &SubmittedTx, block: u64) -> TransportResult<Bytes> {
        self.provider.call(tx.to_call_request()).block(block.into()).await
    }
}
