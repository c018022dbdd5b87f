use crate::{abi::logs::ForceBatch, L1Error};
use alloy_primitives::{Address, Bytes, TxHash, B256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;

/// A decoded `ForceBatch` event, stamped with the L1 block it was emitted at.
///
/// The contract assigns the forced batch number when the submission is mined;
/// this event is the only place the assignment is published, so the workflow
/// recovers it from the log stream rather than from the submission receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceBatchEvent {
    /// The forced batch number assigned by the contract.
    pub forced_batch_number: u64,
    /// The global exit root the forced batch was registered against.
    pub global_exit_root: B256,
    /// The address that submitted the forced batch.
    pub sequencer: Address,
    /// The raw L2 transactions payload.
    pub transactions: Bytes,
    /// The L1 block the event was emitted at.
    pub block_number: u64,
    /// The hash of the submission transaction.
    pub transaction_hash: Option<TxHash>,
}

impl TryFrom<&Log> for ForceBatchEvent {
    type Error = L1Error;

    fn try_from(log: &Log) -> Result<Self, Self::Error> {
        let decoded = ForceBatch::decode_log(&log.inner)?;
        Ok(Self {
            forced_batch_number: decoded.data.forceBatchNum,
            global_exit_root: decoded.data.lastGlobalExitRoot,
            sequencer: decoded.data.sequencer,
            transactions: decoded.data.transactions.clone(),
            block_number: log.block_number.ok_or(L1Error::MissingBlockNumber)?,
            transaction_hash: log.transaction_hash,
        })
    }
}
