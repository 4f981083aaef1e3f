//! Core errors and their Solidity revert encoding.
//!
//! Each variant has a twin in `IGavelErrors` so a failure can cross a dispatched call as revert
//! data and be decoded again by whoever receives it.

use alloy_primitives::{Address, Bytes, FixedBytes};
use alloy_sol_types::{sol, SolError, SolInterface};
use gavel_types::{ActionState, StrategyError};

sol! {
    interface IGavelErrors {
        error UnauthorizedStrategy();
        error Unauthorized();
        error GuardRejected(string reason);
        error InvalidSignature();
        error InfoHashMismatch();
        error InvalidActionState(uint8 expected, uint8 current);
        error DuplicateCast();
        error TimelockNotFinished();
        error Slot0Changed();
        error InsufficientMsgValue();
        error FailedActionExecution(bytes reason);
        error CannotCancelInState(uint8 current);
        error OnlyGovernanceInstance();
        error CannotTargetSelf();
        error InvalidRole(uint8 expected);
        error RoleHasZeroSupply(uint8 role);
        error DisapprovalDisabled();
        error InsufficientApprovalQuantity();
        error InsufficientDisapprovalQuantity();
        error UnauthorizedStrategyLogic();
        error InvalidStrategyConfig();
        error UnknownStrategy(address strategy);
        error DuplicateDeployment(address deployed);
        error InsufficientBalance(address account);
        error ReentrantCall(address target);
        error UnknownSelector(bytes4 selector);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("strategy is not authorized")]
    UnauthorizedStrategy,
    #[error("caller is not authorized")]
    Unauthorized,
    #[error("guard rejected the action: {0}")]
    GuardRejected(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("action info does not match the stored action")]
    InfoHashMismatch,
    #[error("action is {current:?}, expected {expected:?}")]
    InvalidActionState {
        expected: ActionState,
        current: ActionState,
    },
    #[error("policyholder already cast on this action")]
    DuplicateCast,
    #[error("timelock has not finished")]
    TimelockNotFinished,
    #[error("slot0 changed during script execution")]
    Slot0Changed,
    #[error("msg.value is below the action value")]
    InsufficientMsgValue,
    #[error("action execution reverted: {0:?}")]
    FailedActionExecution(Bytes),
    #[error("action cannot be canceled while {0:?}")]
    CannotCancelInState(ActionState),
    #[error("only the executor may call this")]
    OnlyGovernanceInstance,
    #[error("the core and the policy cannot be scripts or guarded targets")]
    CannotTargetSelf,
    #[error("role {0} required")]
    InvalidRole(u8),
    #[error("role {0} has zero supply")]
    RoleHasZeroSupply(u8),
    #[error("disapprovals are disabled for this strategy")]
    DisapprovalDisabled,
    #[error("approval role supply cannot reach the quorum")]
    InsufficientApprovalQuantity,
    #[error("disapproval role supply cannot reach the quorum")]
    InsufficientDisapprovalQuantity,
    #[error("strategy logic is not authorized")]
    UnauthorizedStrategyLogic,
    #[error("strategy config is invalid")]
    InvalidStrategyConfig,
    #[error("no strategy deployed at {0}")]
    UnknownStrategy(Address),
    #[error("address {0} is already deployed")]
    DuplicateDeployment(Address),
    #[error("insufficient balance in {0}")]
    InsufficientBalance(Address),
    #[error("reentrant call into {0}")]
    ReentrantCall(Address),
    #[error("unknown selector {0}")]
    UnknownSelector(FixedBytes<4>),
}

impl CoreError {
    /// ABI-encoded revert data (`selector ‖ args`).
    pub fn revert_data(&self) -> Bytes {
        use IGavelErrors as e;

        let encoded = match self {
            Self::UnauthorizedStrategy => e::UnauthorizedStrategy {}.abi_encode(),
            Self::Unauthorized => e::Unauthorized {}.abi_encode(),
            Self::GuardRejected(reason) => e::GuardRejected {
                reason: reason.clone(),
            }
            .abi_encode(),
            Self::InvalidSignature => e::InvalidSignature {}.abi_encode(),
            Self::InfoHashMismatch => e::InfoHashMismatch {}.abi_encode(),
            Self::InvalidActionState { expected, current } => e::InvalidActionState {
                expected: (*expected).into(),
                current: (*current).into(),
            }
            .abi_encode(),
            Self::DuplicateCast => e::DuplicateCast {}.abi_encode(),
            Self::TimelockNotFinished => e::TimelockNotFinished {}.abi_encode(),
            Self::Slot0Changed => e::Slot0Changed {}.abi_encode(),
            Self::InsufficientMsgValue => e::InsufficientMsgValue {}.abi_encode(),
            Self::FailedActionExecution(reason) => e::FailedActionExecution {
                reason: reason.clone(),
            }
            .abi_encode(),
            Self::CannotCancelInState(current) => e::CannotCancelInState {
                current: (*current).into(),
            }
            .abi_encode(),
            Self::OnlyGovernanceInstance => e::OnlyGovernanceInstance {}.abi_encode(),
            Self::CannotTargetSelf => e::CannotTargetSelf {}.abi_encode(),
            Self::InvalidRole(expected) => e::InvalidRole {
                expected: *expected,
            }
            .abi_encode(),
            Self::RoleHasZeroSupply(role) => e::RoleHasZeroSupply { role: *role }.abi_encode(),
            Self::DisapprovalDisabled => e::DisapprovalDisabled {}.abi_encode(),
            Self::InsufficientApprovalQuantity => e::InsufficientApprovalQuantity {}.abi_encode(),
            Self::InsufficientDisapprovalQuantity => {
                e::InsufficientDisapprovalQuantity {}.abi_encode()
            }
            Self::UnauthorizedStrategyLogic => e::UnauthorizedStrategyLogic {}.abi_encode(),
            Self::InvalidStrategyConfig => e::InvalidStrategyConfig {}.abi_encode(),
            Self::UnknownStrategy(strategy) => e::UnknownStrategy {
                strategy: *strategy,
            }
            .abi_encode(),
            Self::DuplicateDeployment(deployed) => e::DuplicateDeployment {
                deployed: *deployed,
            }
            .abi_encode(),
            Self::InsufficientBalance(account) => e::InsufficientBalance { account: *account }
                .abi_encode(),
            Self::ReentrantCall(target) => e::ReentrantCall { target: *target }.abi_encode(),
            Self::UnknownSelector(selector) => e::UnknownSelector {
                selector: *selector,
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }

    /// Decodes revert data produced by [`CoreError::revert_data`]. Returns `None` for anything
    /// else, including core errors carrying an out-of-range state.
    pub fn decode(data: &[u8]) -> Option<Self> {
        use IGavelErrors::IGavelErrorsErrors as E;

        let state = |raw: u8| ActionState::try_from(raw).ok();
        Some(match E::abi_decode(data, true).ok()? {
            E::UnauthorizedStrategy(_) => Self::UnauthorizedStrategy,
            E::Unauthorized(_) => Self::Unauthorized,
            E::GuardRejected(e) => Self::GuardRejected(e.reason),
            E::InvalidSignature(_) => Self::InvalidSignature,
            E::InfoHashMismatch(_) => Self::InfoHashMismatch,
            E::InvalidActionState(e) => Self::InvalidActionState {
                expected: state(e.expected)?,
                current: state(e.current)?,
            },
            E::DuplicateCast(_) => Self::DuplicateCast,
            E::TimelockNotFinished(_) => Self::TimelockNotFinished,
            E::Slot0Changed(_) => Self::Slot0Changed,
            E::InsufficientMsgValue(_) => Self::InsufficientMsgValue,
            E::FailedActionExecution(e) => Self::FailedActionExecution(e.reason),
            E::CannotCancelInState(e) => Self::CannotCancelInState(state(e.current)?),
            E::OnlyGovernanceInstance(_) => Self::OnlyGovernanceInstance,
            E::CannotTargetSelf(_) => Self::CannotTargetSelf,
            E::InvalidRole(e) => Self::InvalidRole(e.expected),
            E::RoleHasZeroSupply(e) => Self::RoleHasZeroSupply(e.role),
            E::DisapprovalDisabled(_) => Self::DisapprovalDisabled,
            E::InsufficientApprovalQuantity(_) => Self::InsufficientApprovalQuantity,
            E::InsufficientDisapprovalQuantity(_) => Self::InsufficientDisapprovalQuantity,
            E::UnauthorizedStrategyLogic(_) => Self::UnauthorizedStrategyLogic,
            E::InvalidStrategyConfig(_) => Self::InvalidStrategyConfig,
            E::UnknownStrategy(e) => Self::UnknownStrategy(e.strategy),
            E::DuplicateDeployment(e) => Self::DuplicateDeployment(e.deployed),
            E::InsufficientBalance(e) => Self::InsufficientBalance(e.account),
            E::ReentrantCall(e) => Self::ReentrantCall(e.target),
            E::UnknownSelector(e) => Self::UnknownSelector(e.selector),
        })
    }
}

impl From<CoreError> for Bytes {
    fn from(err: CoreError) -> Bytes {
        err.revert_data()
    }
}

impl From<StrategyError> for CoreError {
    fn from(err: StrategyError) -> Self {
        match err {
            StrategyError::InvalidRole(role) => CoreError::InvalidRole(role),
            StrategyError::RoleHasZeroSupply(role) => CoreError::RoleHasZeroSupply(role),
            StrategyError::DisapprovalDisabled => CoreError::DisapprovalDisabled,
            StrategyError::InsufficientApprovalQuantity => CoreError::InsufficientApprovalQuantity,
            StrategyError::InsufficientDisapprovalQuantity => {
                CoreError::InsufficientDisapprovalQuantity
            }
            StrategyError::Unauthorized => CoreError::Unauthorized,
            StrategyError::CannotCancelInState(state) => CoreError::CannotCancelInState(state),
            StrategyError::InvalidConfig => CoreError::InvalidStrategyConfig,
        }
    }
}
