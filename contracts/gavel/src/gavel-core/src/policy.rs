//! In-memory role registry implementing [`PermissionOracle`].

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, B256};
use gavel_types::{PermissionOracle, RoleGrant};

/// Role holdings and role permissions.
///
/// A role's supply is the sum of all issued quantities, expired grants included, until the grant
/// is revoked.
#[derive(Clone, Debug, Default)]
pub struct RolePolicy {
    grants: BTreeMap<(Address, u8), RoleGrant>,
    permissions: BTreeSet<(u8, B256)>,
}

impl RolePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `policyholder`'s holding of `role`; a zero quantity revokes it.
    pub fn set_role_holder(&mut self, policyholder: Address, role: u8, quantity: u128, expiration: u64) {
        if quantity == 0 {
            self.grants.remove(&(policyholder, role));
            return;
        }
        self.grants
            .insert((policyholder, role), RoleGrant { quantity, expiration });
    }

    pub fn set_role_permission(&mut self, role: u8, permission_id: B256, has_permission: bool) {
        if has_permission {
            self.permissions.insert((role, permission_id));
        } else {
            self.permissions.remove(&(role, permission_id));
        }
    }

    pub fn holders(&self, role: u8) -> impl Iterator<Item = (Address, RoleGrant)> + '_ {
        self.grants
            .iter()
            .filter(move |((_, r), _)| *r == role)
            .map(|((holder, _), grant)| (*holder, *grant))
    }
}

impl PermissionOracle for RolePolicy {
    fn role_quantity(&self, policyholder: Address, role: u8) -> RoleGrant {
        self.grants
            .get(&(policyholder, role))
            .copied()
            .unwrap_or_default()
    }

    fn role_has_permission(&self, role: u8, permission_id: B256) -> bool {
        self.permissions.contains(&(role, permission_id))
    }

    fn role_supply(&self, role: u8) -> u128 {
        self.holders(role)
            .fold(0u128, |supply, (_, grant)| supply.saturating_add(grant.quantity))
    }
}
