//! Definitions of Solidity functions called during deployment

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract AccountIngress {
        function getContractVersion() external view returns (uint256);
        function setContractAddress(bytes32 name, address addr) external returns (bool);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract AccountStorage {
        function upgradeVersion(address _newVersion) external;
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract AccountRules {
        function getAccounts() external view returns (address[] memory);
        function addAccounts(address[] calldata accounts) external returns (bool);
        function setCreateContractPermission(address _account, bool _allowed) external returns (bool);
    }
}
