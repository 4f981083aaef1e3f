//! Built-in voting strategies.
//!
//! Both policies share the same periods and role rules ([`QuorumRoles`]) and differ only in how
//! the quorum is expressed: a share of the role supply snapshotted at creation
//! ([`RelativeQuorum`]), or a fixed quantity ([`AbsoluteQuorum`]).

pub mod absolute;
pub mod relative;

use std::collections::BTreeSet;

use alloy_primitives::{Address, U256};
use gavel_types::{PermissionOracle, StrategyError};

pub use absolute::{AbsoluteQuorum, AbsoluteQuorumConfig, AbsoluteQuorumLogic};
pub use relative::{RelativeQuorum, RelativeQuorumConfig, RelativeQuorumLogic};

pub const ONE_HUNDRED_IN_BPS: u16 = 10_000;

/// Periods and role rules common to the quorum strategies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuorumRoles {
    pub approval_period: u64,
    pub queuing_period: u64,
    pub expiration_period: u64,
    pub is_fixed_length_approval_period: bool,
    pub approval_role: u8,
    pub disapproval_role: u8,
    pub force_approval_roles: BTreeSet<u8>,
    pub force_disapproval_roles: BTreeSet<u8>,
}

impl QuorumRoles {
    pub(crate) fn check_approval_role(&self, role: u8) -> Result<(), StrategyError> {
        if role != self.approval_role && !self.force_approval_roles.contains(&role) {
            return Err(StrategyError::InvalidRole(self.approval_role));
        }
        Ok(())
    }

    pub(crate) fn check_disapproval_role(&self, role: u8) -> Result<(), StrategyError> {
        if role != self.disapproval_role && !self.force_disapproval_roles.contains(&role) {
            return Err(StrategyError::InvalidRole(self.disapproval_role));
        }
        Ok(())
    }

    /// A force role outweighs any quorum; otherwise the live quantity of the approval role.
    pub(crate) fn approval_quantity(
        &self,
        oracle: &dyn PermissionOracle,
        policyholder: Address,
        role: u8,
        now: u64,
    ) -> u128 {
        if role != self.approval_role && !self.force_approval_roles.contains(&role) {
            return 0;
        }
        let quantity = oracle.quantity_of(policyholder, role, now);
        if quantity > 0 && self.force_approval_roles.contains(&role) {
            return u128::MAX;
        }
        quantity
    }

    pub(crate) fn disapproval_quantity(
        &self,
        oracle: &dyn PermissionOracle,
        policyholder: Address,
        role: u8,
        now: u64,
    ) -> u128 {
        if role != self.disapproval_role && !self.force_disapproval_roles.contains(&role) {
            return 0;
        }
        let quantity = oracle.quantity_of(policyholder, role, now);
        if quantity > 0 && self.force_disapproval_roles.contains(&role) {
            return u128::MAX;
        }
        quantity
    }
}

/// `ceil(supply * pct / 10000)`, saturating at `u128::MAX`.
pub fn min_amount_needed(supply: u128, pct: u16) -> u128 {
    let bps = U256::from(ONE_HUNDRED_IN_BPS);
    let product = U256::from(supply) * U256::from(pct);
    let needed = product.div_ceil(bps);
    u128::try_from(needed).unwrap_or(u128::MAX)
}
