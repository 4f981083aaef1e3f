use alloy_primitives::{Address, B256};

/// A policyholder's holding of one role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoleGrant {
    pub quantity: u128,
    /// Unix timestamp after which the grant no longer counts.
    pub expiration: u64,
}

impl RoleGrant {
    pub fn is_live(&self, now: u64) -> bool {
        self.quantity > 0 && self.expiration > now
    }
}

/// Read-only view of the policy registry: who holds which role, with what weight, and which
/// permissions a role carries.
///
/// The engine consults this on every creation and cast; implementors decide where the data lives.
pub trait PermissionOracle {
    fn role_quantity(&self, policyholder: Address, role: u8) -> RoleGrant;

    fn role_has_permission(&self, role: u8, permission_id: B256) -> bool;

    /// Total quantity issued for `role`.
    fn role_supply(&self, role: u8) -> u128;

    fn has_role(&self, policyholder: Address, role: u8, now: u64) -> bool {
        self.role_quantity(policyholder, role).is_live(now)
    }

    /// Quantity counted for a cast made at `now`; zero once the grant expired.
    fn quantity_of(&self, policyholder: Address, role: u8, now: u64) -> u128 {
        let grant = self.role_quantity(policyholder, role);
        if grant.is_live(now) {
            grant.quantity
        } else {
            0
        }
    }
}
