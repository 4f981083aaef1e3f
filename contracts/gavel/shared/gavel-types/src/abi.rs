//! Solidity ABI surface of the governance core.
//!
//! Targets reach the core by calling its address with calldata encoded against `IGavelCore`, and
//! the signed-message structs double as the EIP-712 typed data for the `*BySig` entry points.

use alloy_sol_types::sol;

sol! {
    /// Immutable identity of an action. Only its hash is stored; callers resupply it on every
    /// operation after creation.
    #[derive(Debug, PartialEq, Eq)]
    struct ActionInfo {
        uint256 id;
        address creator;
        uint8 creatorRole;
        address strategy;
        address target;
        uint256 value;
        bytes data;
    }

    /// Preimage of a permission id: `keccak256(abi.encode(PermissionData))`.
    #[derive(Debug, PartialEq, Eq)]
    struct PermissionData {
        address target;
        bytes4 selector;
        address strategy;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CreateAction {
        address policyholder;
        uint8 role;
        address strategy;
        address target;
        uint256 value;
        bytes data;
        string description;
        uint256 nonce;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CastApproval {
        address policyholder;
        uint8 role;
        ActionInfo actionInfo;
        string reason;
        uint256 nonce;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CastDisapproval {
        address policyholder;
        uint8 role;
        ActionInfo actionInfo;
        string reason;
        uint256 nonce;
    }

    interface IGavelCore {
        function createAction(uint8 role, address strategy, address target, uint256 value, bytes data, string description)
            external
            returns (uint256 actionId);
        function createActionBySig(
            address policyholder,
            uint8 role,
            address strategy,
            address target,
            uint256 value,
            bytes data,
            string description,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external returns (uint256 actionId);

        function castApproval(uint8 role, ActionInfo actionInfo, string reason) external returns (uint128);
        function castApprovalBySig(
            address policyholder,
            uint8 role,
            ActionInfo actionInfo,
            string reason,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external returns (uint128);
        function castDisapproval(uint8 role, ActionInfo actionInfo, string reason) external returns (uint128);
        function castDisapprovalBySig(
            address policyholder,
            uint8 role,
            ActionInfo actionInfo,
            string reason,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external returns (uint128);

        function queueAction(ActionInfo actionInfo) external;
        function executeAction(ActionInfo actionInfo) external payable returns (bytes);
        function cancelAction(ActionInfo actionInfo) external;
        function getActionState(ActionInfo actionInfo) external view returns (uint8);
        function incrementNonce(bytes4 selector) external;

        function createStrategies(address logic, bytes[] configs) external;
        function authorizeStrategies(address[] strategies) external;
        function unauthorizeStrategies(address[] strategies) external;
        function setStrategyLogicAuthorization(address logic, bool authorized) external;
        function authorizeScript(address script, bool authorized) external;
        function setGuard(address target, bytes4 selector, address guard) external;
        function createAccounts(string[] names) external;
    }
}
