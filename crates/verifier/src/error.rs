use alloy_json_rpc::RpcError;
use alloy_transport::TransportErrorKind;
use rollup_ops_poller::TimeoutExpired;

/// An error that occurred while verifying cross-layer state.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    /// The wait deadline elapsed before the state transition was observed.
    #[error(transparent)]
    Timeout(#[from] TimeoutExpired),
    /// An introspection RPC failed.
    #[error("rollup node rpc error: {0}")]
    Rpc(#[from] RpcError<TransportErrorKind>),
}

/// The closed set of conditions the harness retries in place.
///
/// Everything else coming out of the same calls is fatal: retryability is
/// decided here, once, instead of by message matching scattered through the
/// workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Retryable {
    /// The node has not yet synchronized the queried batch.
    #[display("batch not yet synchronized")]
    BatchNotSynchronized,
    /// The L1 node has not yet indexed the queried logs.
    #[display("logs not yet indexed")]
    LogNotIndexed,
}

/// Classifies a node error response, returning the retryable cause if the
/// error only means the node has not caught up yet.
pub fn retryable_cause(err: &RpcError<TransportErrorKind>) -> Option<Retryable> {
    let RpcError::ErrorResp(payload) = err else { return None };
    let message = payload.message.to_lowercase();
    (message.contains("not synchronized") || message.contains("not found"))
        .then_some(Retryable::BatchNotSynchronized)
}
