use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::TransactionRequest;

/// A handle to a signed, submitted transaction.
///
/// Produced at submission time and immutable afterwards. The recorded call
/// parameters allow a read-only replay of the transaction against historical
/// state, which is how a revert reason is recovered: the EVM revert string is
/// only emitted transiently during execution and is not persisted in the
/// receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTx {
    /// The transaction hash.
    pub hash: TxHash,
    /// The sender address.
    pub from: Address,
    /// The recipient, `None` for deployments.
    pub to: Option<Address>,
    /// The value transferred in wei.
    pub value: U256,
    /// The calldata.
    pub input: Bytes,
    /// The gas limit.
    pub gas: u64,
    /// The gas price in wei.
    pub gas_price: u128,
    /// The sender nonce the transaction was signed with.
    pub nonce: u64,
}

impl SubmittedTx {
    /// Rebuilds the equivalent read-only call request, suitable for replaying
    /// the transaction through the call-simulation RPC pinned at a historical
    /// block.
    pub fn to_call_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .with_from(self.from)
            .with_value(self.value)
            .with_input(self.input.clone())
            .with_gas_limit(self.gas)
            .with_gas_price(self.gas_price);
        if let Some(to) = self.to {
            request = request.with_to(to);
        }
        request
    }
}
