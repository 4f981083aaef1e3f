//! Action identity, lifecycle states and stored action records.

use alloy_primitives::{keccak256, FixedBytes, B256};
use alloy_sol_types::SolValue;

use crate::abi::{ActionInfo, PermissionData};

/// Derived lifecycle state of an action. The discriminants are the values returned by
/// `getActionState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ActionState {
    Active = 0,
    Canceled = 1,
    Failed = 2,
    Approved = 3,
    Queued = 4,
    Expired = 5,
    Executed = 6,
}

impl ActionState {
    /// No operation moves an action out of a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ActionState::Canceled | ActionState::Failed | ActionState::Expired | ActionState::Executed
        )
    }
}

impl From<ActionState> for u8 {
    fn from(state: ActionState) -> u8 {
        state as u8
    }
}

impl TryFrom<u8> for ActionState {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => ActionState::Active,
            1 => ActionState::Canceled,
            2 => ActionState::Failed,
            3 => ActionState::Approved,
            4 => ActionState::Queued,
            5 => ActionState::Expired,
            6 => ActionState::Executed,
            _ => return Err(()),
        })
    }
}

/// Mutable per-action record kept by the core, keyed by action id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Action {
    /// Hash of the `ActionInfo` the action was created with.
    pub info_hash: B256,
    pub executed: bool,
    pub canceled: bool,
    /// Whether the target was an authorized script when the action was created.
    pub is_script: bool,
    pub creation_time: u64,
    /// Set once the action is queued.
    pub min_execution_time: Option<u64>,
    pub total_approvals: u128,
    pub total_disapprovals: u128,
}

impl Action {
    pub fn is_queued(&self) -> bool {
        self.min_execution_time.is_some()
    }
}

/// First four bytes of `data`, zero-padded when the calldata is shorter.
pub fn selector_of(data: &[u8]) -> FixedBytes<4> {
    let mut selector = [0u8; 4];
    let len = data.len().min(4);
    selector[..len].copy_from_slice(&data[..len]);
    FixedBytes(selector)
}

impl ActionInfo {
    /// keccak256 over the packed fields:
    /// `id ‖ creator ‖ creatorRole ‖ strategy ‖ target ‖ value ‖ data`.
    pub fn info_hash(&self) -> B256 {
        let mut buf = Vec::with_capacity(32 + 20 + 1 + 20 + 20 + 32 + self.data.len());
        buf.extend_from_slice(&self.id.to_be_bytes::<32>());
        buf.extend_from_slice(self.creator.as_slice());
        buf.push(self.creatorRole);
        buf.extend_from_slice(self.strategy.as_slice());
        buf.extend_from_slice(self.target.as_slice());
        buf.extend_from_slice(&self.value.to_be_bytes::<32>());
        buf.extend_from_slice(&self.data);
        keccak256(buf)
    }

    pub fn selector(&self) -> FixedBytes<4> {
        selector_of(&self.data)
    }

    /// Permission a creator's role must hold to create this action.
    pub fn permission_id(&self) -> B256 {
        PermissionData {
            target: self.target,
            selector: self.selector(),
            strategy: self.strategy,
        }
        .permission_id()
    }
}

impl PermissionData {
    pub fn permission_id(&self) -> B256 {
        keccak256(self.abi_encode())
    }
}
