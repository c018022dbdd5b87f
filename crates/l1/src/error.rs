use alloy_json_rpc::RpcError;
use alloy_transport::TransportErrorKind;

/// An error that occurred interacting with the L1 contracts.
#[derive(Debug, thiserror::Error)]
pub enum L1Error {
    /// A provider error at the RPC level.
    #[error("l1 provider rpc error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// An ABI encoding or decoding error.
    #[error("abi error: {0}")]
    SolType(#[from] alloy_sol_types::Error),
    /// A log was returned without a block number.
    #[error("missing block number for log")]
    MissingBlockNumber,
}
