//! Relative quorum: approval and disapproval thresholds are shares (in basis points) of the role
//! supplies snapshotted when the action is created.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolValue};
use gavel_types::{
    Action, ActionInfo, PermissionOracle, Strategy, StrategyError, StrategyLogic,
};

use super::{min_amount_needed, QuorumRoles, ONE_HUNDRED_IN_BPS};

sol! {
    /// Deployment config for a relative quorum instance.
    #[derive(Debug, PartialEq, Eq)]
    struct RelativeQuorumConfig {
        uint64 approvalPeriod;
        uint64 queuingPeriod;
        uint64 expirationPeriod;
        bool isFixedLengthApprovalPeriod;
        uint16 minApprovalPct;
        uint16 minDisapprovalPct;
        uint8 approvalRole;
        uint8 disapprovalRole;
        uint8[] forceApprovalRoles;
        uint8[] forceDisapprovalRoles;
    }
}

#[derive(Clone, Debug)]
pub struct RelativeQuorum {
    roles: QuorumRoles,
    min_approval_pct: u16,
    /// Above 100% disables disapprovals.
    min_disapproval_pct: u16,
    approval_supply: BTreeMap<U256, u128>,
    disapproval_supply: BTreeMap<U256, u128>,
}

impl RelativeQuorum {
    pub fn new(config: RelativeQuorumConfig) -> Result<Self, StrategyError> {
        if config.minApprovalPct > ONE_HUNDRED_IN_BPS {
            return Err(StrategyError::InvalidConfig);
        }
        Ok(Self {
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
            min_approval_pct: config.minApprovalPct,
            min_disapproval_pct: config.minDisapprovalPct,
            approval_supply: BTreeMap::new(),
            disapproval_supply: BTreeMap::new(),
        })
    }

    pub fn roles(&self) -> &QuorumRoles {
        &self.roles
    }

    /// Approval role supply recorded when the action was created.
    pub fn approval_supply(&self, id: U256) -> Option<u128> {
        self.approval_supply.get(&id).copied()
    }

    pub fn disapproval_supply(&self, id: U256) -> Option<u128> {
        self.disapproval_supply.get(&id).copied()
    }

    fn disapprovals_enabled(&self) -> bool {
        self.min_disapproval_pct <= ONE_HUNDRED_IN_BPS
    }
}

impl Strategy for RelativeQuorum {
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
        info: &ActionInfo,
        oracle: &dyn PermissionOracle,
    ) -> Result<(), StrategyError> {
        let approval_supply = oracle.role_supply(self.roles.approval_role);
        if approval_supply == 0 {
            return Err(StrategyError::RoleHasZeroSupply(self.roles.approval_role));
        }

        let disapproval_supply = oracle.role_supply(self.roles.disapproval_role);
        if self.disapprovals_enabled() && disapproval_supply == 0 {
            return Err(StrategyError::RoleHasZeroSupply(self.roles.disapproval_role));
        }

        self.approval_supply.insert(info.id, approval_supply);
        self.disapproval_supply.insert(info.id, disapproval_supply);
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

    fn is_action_approved(&self, info: &ActionInfo, action: &Action) -> bool {
        match self.approval_supply.get(&info.id) {
            Some(&supply) => {
                action.total_approvals >= min_amount_needed(supply, self.min_approval_pct)
            }
            None => false,
        }
    }

    fn is_action_disapproved(&self, info: &ActionInfo, action: &Action) -> bool {
        if !self.disapprovals_enabled() {
            return false;
        }
        match self.disapproval_supply.get(&info.id) {
            Some(&supply) => {
                action.total_disapprovals >= min_amount_needed(supply, self.min_disapproval_pct)
            }
            None => false,
        }
    }
}

/// Deploys [`RelativeQuorum`] instances from ABI-encoded [`RelativeQuorumConfig`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelativeQuorumLogic;

impl StrategyLogic for RelativeQuorumLogic {
    fn deploy(&self, config: &[u8]) -> Result<Box<dyn Strategy>, StrategyError> {
        let config = RelativeQuorumConfig::abi_decode(config, true)
            .map_err(|_| StrategyError::InvalidConfig)?;
        Ok(Box::new(RelativeQuorum::new(config)?))
    }
}
