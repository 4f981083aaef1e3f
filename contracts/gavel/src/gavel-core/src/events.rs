use alloy_primitives::{Address, Bytes, FixedBytes, U256};

/// Events emitted by the core, in emission order.
///
/// Events from a reverted entry point are discarded together with its state changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreEvent {
    ActionCreated {
        id: U256,
        creator: Address,
        role: u8,
        strategy: Address,
        target: Address,
        value: U256,
        data: Bytes,
        description: String,
    },
    ApprovalCast {
        id: U256,
        policyholder: Address,
        role: u8,
        quantity: u128,
        reason: String,
    },
    DisapprovalCast {
        id: U256,
        policyholder: Address,
        role: u8,
        quantity: u128,
        reason: String,
    },
    ActionQueued {
        id: U256,
        caller: Address,
        strategy: Address,
        creator: Address,
        min_execution_time: u64,
    },
    ActionExecuted {
        id: U256,
        caller: Address,
        strategy: Address,
        creator: Address,
        result: Bytes,
    },
    ActionCanceled {
        id: U256,
        caller: Address,
    },
    StrategyCreated {
        strategy: Address,
        logic: Address,
        config: Bytes,
    },
    StrategyAuthorized {
        strategy: Address,
    },
    StrategyUnauthorized {
        strategy: Address,
    },
    StrategyLogicAuthorized {
        logic: Address,
        authorized: bool,
    },
    ScriptAuthorized {
        script: Address,
        authorized: bool,
    },
    ActionGuardSet {
        target: Address,
        selector: FixedBytes<4>,
        guard: Address,
    },
    AccountCreated {
        account: Address,
        name: String,
    },
    NonceIncremented {
        policyholder: Address,
        selector: FixedBytes<4>,
        nonce: U256,
    },
}
