//! Absolute quorum: fixed approval and disapproval quantities.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolValue};
use gavel_types::{
    Action, ActionInfo, ActionState, PermissionOracle, Strategy, StrategyError, StrategyLogic,
};

use super::QuorumRoles;

sol! {
    /// Deployment config for an absolute quorum instance. `minDisapprovals == type(uint128).max`
    /// disables disapprovals.
    #[derive(Debug, PartialEq, Eq)]
    struct AbsoluteQuorumConfig {
        uint64 approvalPeriod;
        uint64 queuingPeriod;
        uint64 expirationPeriod;
        bool isFixedLengthApprovalPeriod;
        uint128 minApprovals;
        uint128 minDisapprovals;
        uint8 approvalRole;
        uint8 disapprovalRole;
        uint8[] forceApprovalRoles;
        uint8[] forceDisapprovalRoles;
    }
}

#[derive(Clone, Debug)]
pub struct AbsoluteQuorum {
    roles: QuorumRoles,
    min_approvals: u128,
    min_disapprovals: u128,
}

impl AbsoluteQuorum {
    pub fn new(config: AbsoluteQuorumConfig) -> Self {
        Self {
            roles: QuorumRoles {
                approval_period: config.approvalPeriod,
                queuing_period: config.queuingPeriod,
                expiration_period: config.expirationPeriod,
                is_fixed_length_approval_period: config.isFixedLengthApprovalPeriod,
                approval_role: config.approvalRole,
                disapproval_role: config.disapprovalRole,
                force_approval_roles: config.forceApprovalRoles.into_iter().collect(),
                force_disapproval_roles: config.forceDisapprovalRoles.into_iter().collect(),
            },
            min_approvals: config.minApprovals,
            min_disapprovals: config.minDisapprovals,
        }
    }

    pub fn roles(&self) -> &QuorumRoles {
        &self.roles
    }

    fn disapprovals_enabled(&self) -> bool {
        self.min_disapprovals != u128::MAX
    }
}

impl Strategy for AbsoluteQuorum {
    fn approval_period(&self) -> u64 {
        self.roles.approval_period
    }

    fn queuing_period(&self) -> u64 {
        self.roles.queuing_period
    }

    fn expiration_period(&self) -> u64 {
        self.roles.expiration_period
    }

    fn is_fixed_length_approval_period(&self) -> bool {
        self.roles.is_fixed_length_approval_period
    }

    fn validate_action_creation(
        &mut self,
        _info: &ActionInfo,
        oracle: &dyn PermissionOracle,
    ) -> Result<(), StrategyError> {
        if oracle.role_supply(self.roles.approval_role) < self.min_approvals {
            return Err(StrategyError::InsufficientApprovalQuantity);
        }
        if self.disapprovals_enabled()
            && oracle.role_supply(self.roles.disapproval_role) < self.min_disapprovals
        {
            return Err(StrategyError::InsufficientDisapprovalQuantity);
        }
        Ok(())
    }

    fn check_if_approval_enabled(
        &self,
        _info: &ActionInfo,
        _policyholder: Address,
        role: u8,
    ) -> Result<(), StrategyError> {
        self.roles.check_approval_role(role)
    }

    fn check_if_disapproval_enabled(
        &self,
        _info: &ActionInfo,
        _policyholder: Address,
        role: u8,
    ) -> Result<(), StrategyError> {
        if !self.disapprovals_enabled() {
            return Err(StrategyError::DisapprovalDisabled);
        }
        self.roles.check_disapproval_role(role)
    }

    fn approval_quantity(
        &self,
        oracle: &dyn PermissionOracle,
        policyholder: Address,
        role: u8,
        now: u64,
    ) -> u128 {
        self.roles.approval_quantity(oracle, policyholder, role, now)
    }

    fn disapproval_quantity(
        &self,
        oracle: &dyn PermissionOracle,
        policyholder: Address,
        role: u8,
        now: u64,
    ) -> u128 {
        self.roles.disapproval_quantity(oracle, policyholder, role, now)
    }

    fn is_action_approved(&self, _info: &ActionInfo, action: &Action) -> bool {
        action.total_approvals >= self.min_approvals
    }

    fn is_action_disapproved(&self, _info: &ActionInfo, action: &Action) -> bool {
        self.disapprovals_enabled() && action.total_disapprovals >= self.min_disapprovals
    }

    /// The creator may also pull a queued action.
    fn validate_action_cancelation(
        &self,
        info: &ActionInfo,
        state: ActionState,
        caller: Address,
    ) -> Result<(), StrategyError> {
        if !matches!(
            state,
            ActionState::Active | ActionState::Approved | ActionState::Queued
        ) {
            return Err(StrategyError::CannotCancelInState(state));
        }
        if caller != info.creator {
            return Err(StrategyError::Unauthorized);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AbsoluteQuorumLogic;

impl StrategyLogic for AbsoluteQuorumLogic {
    fn deploy(&self, config: &[u8]) -> Result<Box<dyn Strategy>, StrategyError> {
        let config = AbsoluteQuorumConfig::abi_decode(config, true)
            .map_err(|_| StrategyError::InvalidConfig)?;
        Ok(Box::new(AbsoluteQuorum::new(config)))
    }
}
