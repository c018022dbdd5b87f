use crate::{error::LeafField, ForcedBatchError};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockId;
use alloy_transport::TransportResult;
use rollup_ops_primitives::ExpectedLeaf;

/// Read-only access to L2 account state pinned at a block.
///
/// Blanket-implemented for any provider. The workflow pins all reads at the
/// last block of the verified batch, the block that materializes the batch's
/// state root.
#[async_trait::async_trait]
pub trait StateReader {
    /// Returns the account balance.
    async fn balance(&self, address: Address, block: BlockId) -> TransportResult<U256>;

    /// Returns the account nonce.
    async fn nonce(&self, address: Address, block: BlockId) -> TransportResult<u64>;

    /// Returns the value of the account storage slot.
    async fn storage_at(
        &self,
        address: Address,
        slot: U256,
        block: BlockId,
    ) -> TransportResult<U256>;

    /// Returns the account's deployed code.
    async fn code_at(&self, address: Address, block: BlockId) -> TransportResult<Bytes>;

    /// Returns the number of the block with the given hash, if the node knows
    /// it.
    async fn block_number_by_hash(&self, hash: B256) -> TransportResult<Option<u64>>;
}

#[async_trait::async_trait]
impl<P: Provider> StateReader for P {
    async fn balance(&self, address: Address, block: BlockId) -> TransportResult<U256> {
        self.get_balance(address).block_id(block).await
    }

    async fn nonce(&self, address: Address, block: BlockId) -> TransportResult<u64> {
        self.get_transaction_count(address).block_id(block).await
    }

    async fn storage_at(
        &self,
        address: Address,
        slot: U256,
        block: BlockId,
    ) -> TransportResult<U256> {
        self.get_storage_at(address, slot).block_id(block).await
    }

    async fn code_at(&self, address: Address, block: BlockId) -> TransportResult<Bytes> {
        self.get_code_at(address).block_id(block).await
    }

    async fn block_number_by_hash(&self, hash: B256) -> TransportResult<Option<u64>> {
        Ok(self.get_block_by_hash(hash).await?.map(|block| block.header.number))
    }
}

/// Asserts the expected leaf against node state pinned at `block`, reporting
/// the first mismatching field with its expected and actual values.
pub(crate) async fn verify_leaf<S>(
    state: &S,
    block: BlockId,
    leaf: &ExpectedLeaf,
) -> Result<(), ForcedBatchError>
where
    S: StateReader + Sync + ?Sized,
{
    let balance = state.balance(leaf.address, block).await?;
    if balance != leaf.balance {
        return Err(mismatch(leaf.address, LeafField::Balance, leaf.balance, balance));
    }

    let nonce = state.nonce(leaf.address, block).await?;
    if nonce != leaf.nonce {
        return Err(mismatch(leaf.address, LeafField::Nonce, leaf.nonce, nonce));
    }

    if let Some(storage) = &leaf.storage {
        for (slot, expected) in storage {
            let actual = state.storage_at(leaf.address, *slot, block).await?;
            if actual != *expected {
                return Err(mismatch(leaf.address, LeafField::Storage(*slot), expected, actual));
            }
        }
    }

    if let Some(expected_hash) = leaf.code_hash {
        let actual = keccak256(state.code_at(leaf.address, block).await?);
        if actual != expected_hash {
            return Err(mismatch(leaf.address, LeafField::CodeHash, expected_hash, actual));
        }
    }

    tracing::debug!(target: "ops::forced_batch", address = %leaf.address, "leaf verified");
    Ok(())
}

fn mismatch(
    address: Address,
    field: LeafField,
    expected: impl ToString,
    actual: impl ToString,
) -> ForcedBatchError {
    ForcedBatchError::LeafMismatch {
        address,
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
