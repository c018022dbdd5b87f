use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    function forceBatch(bytes calldata transactions, uint256 maticAmount) external;

    #[derive(Debug)]
    function activateForceBatches() external;

    #[derive(Debug)]
    function isForcedBatchDisallowed() external view returns (bool);

    #[derive(Debug)]
    function lastForceBatch() external view returns (uint64);

    #[derive(Debug)]
    function getLastGlobalExitRoot() external view returns (bytes32);
}
