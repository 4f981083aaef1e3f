//! Derived action state.
//!
//! Nothing but `canceled`, `executed` and `min_execution_time` is stored; the state is recomputed
//! from the record, its strategy and the clock on every read.

use gavel_types::{Action, ActionInfo, ActionState, Strategy};

pub fn derive_action_state(
    strategy: &dyn Strategy,
    info: &ActionInfo,
    action: &Action,
    now: u64,
) -> ActionState {
    if action.canceled {
        return ActionState::Canceled;
    }
    if action.executed {
        return ActionState::Executed;
    }

    if !action.is_queued() {
        if strategy.is_active(info, action, now) {
            return ActionState::Active;
        }
        if !strategy.is_action_approved(info, action) {
            return ActionState::Failed;
        }
        return ActionState::Approved;
    }

    if strategy.is_action_disapproved(info, action) {
        return ActionState::Failed;
    }
    if strategy.is_action_expired(action, now) {
        return ActionState::Expired;
    }
    ActionState::Queued
}
