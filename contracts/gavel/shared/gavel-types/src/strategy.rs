//! The strategy seam: how an action's votes turn into approval, disapproval and timing.

use alloy_primitives::Address;

use crate::{
    abi::ActionInfo,
    action::{Action, ActionState},
    oracle::PermissionOracle,
};

/// Errors a strategy reports back to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyError {
    /// The cast used a role that is neither the strategy's role nor a force role for it.
    InvalidRole(u8),
    RoleHasZeroSupply(u8),
    DisapprovalDisabled,
    InsufficientApprovalQuantity,
    InsufficientDisapprovalQuantity,
    Unauthorized,
    CannotCancelInState(ActionState),
    /// Deployment config did not decode or was out of range.
    InvalidConfig,
}

/// A deployed strategy instance.
///
/// `validate_action_creation` is the only mutating hook; strategies that snapshot role supply at
/// creation do it there. Everything else is a pure query of the strategy and the action record.
pub trait Strategy: StrategyClone {
    fn approval_period(&self) -> u64;

    fn queuing_period(&self) -> u64;

    fn expiration_period(&self) -> u64;

    fn is_fixed_length_approval_period(&self) -> bool;

    fn validate_action_creation(
        &mut self,
        info: &ActionInfo,
        oracle: &dyn PermissionOracle,
    ) -> Result<(), StrategyError>;

    fn check_if_approval_enabled(
        &self,
        info: &ActionInfo,
        policyholder: Address,
        role: u8,
    ) -> Result<(), StrategyError>;

    fn check_if_disapproval_enabled(
        &self,
        info: &ActionInfo,
        policyholder: Address,
        role: u8,
    ) -> Result<(), StrategyError>;

    fn approval_quantity(
        &self,
        oracle: &dyn PermissionOracle,
        policyholder: Address,
        role: u8,
        now: u64,
    ) -> u128;

    fn disapproval_quantity(
        &self,
        oracle: &dyn PermissionOracle,
        policyholder: Address,
        role: u8,
        now: u64,
    ) -> u128;

    fn is_action_approved(&self, info: &ActionInfo, action: &Action) -> bool;

    fn is_action_disapproved(&self, info: &ActionInfo, action: &Action) -> bool;

    fn approval_end_time(&self, action: &Action) -> u64 {
        action.creation_time.saturating_add(self.approval_period())
    }

    /// Whether the approval window is still open for the action.
    fn is_active(&self, info: &ActionInfo, action: &Action, now: u64) -> bool {
        now <= self.approval_end_time(action)
            && (self.is_fixed_length_approval_period() || !self.is_action_approved(info, action))
    }

    fn min_execution_time(&self, now: u64) -> u64 {
        now.saturating_add(self.queuing_period())
    }

    fn is_action_expired(&self, action: &Action, now: u64) -> bool {
        match action.min_execution_time {
            Some(min_execution_time) => {
                now > min_execution_time.saturating_add(self.expiration_period())
            }
            None => false,
        }
    }

    /// Only the creator may cancel, and only while the action is `Active` or `Approved`.
    fn validate_action_cancelation(
        &self,
        info: &ActionInfo,
        state: ActionState,
        caller: Address,
    ) -> Result<(), StrategyError> {
        if !matches!(state, ActionState::Active | ActionState::Approved) {
            return Err(StrategyError::CannotCancelInState(state));
        }
        if caller != info.creator {
            return Err(StrategyError::Unauthorized);
        }
        Ok(())
    }
}

pub trait StrategyClone {
    fn clone_box(&self) -> Box<dyn Strategy>;
}

impl<T> StrategyClone for T
where
    T: Strategy + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Strategy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Factory for strategy instances. The core deploys one instance per config.
pub trait StrategyLogic: StrategyLogicClone {
    fn deploy(&self, config: &[u8]) -> Result<Box<dyn Strategy>, StrategyError>;
}

pub trait StrategyLogicClone {
    fn clone_box(&self) -> Box<dyn StrategyLogic>;
}

impl<T> StrategyLogicClone for T
where
    T: StrategyLogic + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn StrategyLogic> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn StrategyLogic> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
