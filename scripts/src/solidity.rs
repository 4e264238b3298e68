//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    #[sol(rpc)]
    contract Subscriptions {
        constructor(address token, uint64 epochSeconds);

        function subscriptions(address user)
            external
            view
            returns (uint64 start, uint64 end, uint128 rate);
    }

    #[sol(rpc)]
    interface IOwnable {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
    }
}
