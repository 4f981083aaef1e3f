//! Creating, voting on, queuing and canceling actions.

use alloy_primitives::{Address, Bytes, U256};
use gavel_types::{Action, ActionInfo, ActionState, PermissionOracle};
use tracing::{debug, info, warn};

use super::GovernanceCore;
use crate::{env::Msg, errors::CoreError, events::CoreEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Vote {
    Approval,
    Disapproval,
}

impl Vote {
    /// State an action must be in to receive this kind of vote.
    fn window(self) -> ActionState {
        match self {
            Vote::Approval => ActionState::Active,
            Vote::Disapproval => ActionState::Queued,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum GuardHook {
    Creation,
    PreExecution,
    PostExecution,
}

impl<P: PermissionOracle> GovernanceCore<P> {
    /// Creates an action for `msg.sender` and returns its id.
    #[allow(clippy::too_many_arguments)]
    pub fn create_action(
        &mut self,
        msg: Msg,
        role: u8,
        strategy: Address,
        target: Address,
        value: U256,
        data: Bytes,
        description: &str,
    ) -> Result<U256, CoreError> {
        self.atomically(|core| {
            core.create_action_for(msg.sender, role, strategy, target, value, data, description)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create_action_for(
        &mut self,
        creator: Address,
        role: u8,
        strategy: Address,
        target: Address,
        value: U256,
        data: Bytes,
        description: &str,
    ) -> Result<U256, CoreError> {
        if !self.storage.authorized_strategies.contains(&strategy) {
            return Err(CoreError::UnauthorizedStrategy);
        }

        let id = self.storage.action_count;
        let info = ActionInfo {
            id,
            creator,
            creatorRole: role,
            strategy,
            target,
            value,
            data,
        };

        let now = self.block.timestamp;
        if !self.policy.has_role(creator, role, now)
            || !self.policy.role_has_permission(role, info.permission_id())
        {
            return Err(CoreError::Unauthorized);
        }

        let policy = &self.policy;
        let instance = self
            .storage
            .strategies
            .get_mut(&strategy)
            .ok_or(CoreError::UnknownStrategy(strategy))?;
        instance.validate_action_creation(&info, policy)?;

        self.run_guard(&info, GuardHook::Creation)?;

        let is_script = self.storage.authorized_scripts.contains(&target);
        self.storage.actions.insert(
            id,
            Action {
                info_hash: info.info_hash(),
                is_script,
                creation_time: now,
                ..Action::default()
            },
        );
        self.storage.action_count = id + U256::from(1u64);

        self.emit(CoreEvent::ActionCreated {
            id,
            creator,
            role,
            strategy,
            target,
            value,
            data: info.data.clone(),
            description: description.to_owned(),
        });
        info!(%id, %creator, %strategy, %target, is_script, "action created");
        Ok(id)
    }

    /// Casts `msg.sender`'s approval and returns the weight it added.
    pub fn cast_approval(
        &mut self,
        msg: Msg,
        role: u8,
        info: &ActionInfo,
        reason: &str,
    ) -> Result<u128, CoreError> {
        self.atomically(|core| core.cast_vote(Vote::Approval, msg.sender, role, info, reason))
    }

    pub fn cast_disapproval(
        &mut self,
        msg: Msg,
        role: u8,
        info: &ActionInfo,
        reason: &str,
    ) -> Result<u128, CoreError> {
        self.atomically(|core| core.cast_vote(Vote::Disapproval, msg.sender, role, info, reason))
    }

    pub(crate) fn cast_vote(
        &mut self,
        vote: Vote,
        policyholder: Address,
        role: u8,
        info: &ActionInfo,
        reason: &str,
    ) -> Result<u128, CoreError> {
        let action = self.stored_action(info)?;
        let current = self.action_state(info, action)?;
        let expected = vote.window();
        // an action being dispatched takes no more votes
        if self.storage.executing.contains(&info.id) || current != expected {
            return Err(CoreError::InvalidActionState { expected, current });
        }

        let now = self.block.timestamp;
        if !self.policy.has_role(policyholder, role, now) {
            return Err(CoreError::Unauthorized);
        }

        let strategy = self.strategy_of(info.strategy)?;
        let quantity = match vote {
            Vote::Approval => {
                strategy.check_if_approval_enabled(info, policyholder, role)?;
                strategy.approval_quantity(&self.policy, policyholder, role, now)
            }
            Vote::Disapproval => {
                strategy.check_if_disapproval_enabled(info, policyholder, role)?;
                strategy.disapproval_quantity(&self.policy, policyholder, role, now)
            }
        };

        let casts = match vote {
            Vote::Approval => &mut self.storage.approvals,
            Vote::Disapproval => &mut self.storage.disapprovals,
        };
        if !casts.insert((info.id, policyholder)) {
            return Err(CoreError::DuplicateCast);
        }

        let record = self.action_record_mut(info.id)?;
        let event = match vote {
            Vote::Approval => {
                record.total_approvals = record.total_approvals.saturating_add(quantity);
                CoreEvent::ApprovalCast {
                    id: info.id,
                    policyholder,
                    role,
                    quantity,
                    reason: reason.to_owned(),
                }
            }
            Vote::Disapproval => {
                record.total_disapprovals = record.total_disapprovals.saturating_add(quantity);
                CoreEvent::DisapprovalCast {
                    id: info.id,
                    policyholder,
                    role,
                    quantity,
                    reason: reason.to_owned(),
                }
            }
        };
        self.emit(event);
        debug!(id = %info.id, %policyholder, ?vote, quantity, "vote cast");
        Ok(quantity)
    }

    /// Queues an approved action and returns its minimum execution time.
    pub fn queue_action(&mut self, msg: Msg, info: &ActionInfo) -> Result<u64, CoreError> {
        self.atomically(|core| {
            let action = core.stored_action(info)?;
            let current = core.action_state(info, action)?;
            if current != ActionState::Approved {
                return Err(CoreError::InvalidActionState {
                    expected: ActionState::Approved,
                    current,
                });
            }

            let min_execution_time = core
                .strategy_of(info.strategy)?
                .min_execution_time(core.block.timestamp);
            core.action_record_mut(info.id)?.min_execution_time = Some(min_execution_time);

            core.emit(CoreEvent::ActionQueued {
                id: info.id,
                caller: msg.sender,
                strategy: info.strategy,
                creator: info.creator,
                min_execution_time,
            });
            info!(id = %info.id, min_execution_time, "action queued");
            Ok(min_execution_time)
        })
    }

    /// Cancels an action; the action's strategy decides who may and when.
    pub fn cancel_action(&mut self, msg: Msg, info: &ActionInfo) -> Result<(), CoreError> {
        self.atomically(|core| {
            let action = core.stored_action(info)?;
            let current = core.action_state(info, action)?;
            if core.storage.executing.contains(&info.id) {
                return Err(CoreError::CannotCancelInState(current));
            }
            core.strategy_of(info.strategy)?
                .validate_action_cancelation(info, current, msg.sender)?;

            core.action_record_mut(info.id)?.canceled = true;
            core.emit(CoreEvent::ActionCanceled {
                id: info.id,
                caller: msg.sender,
            });
            info!(id = %info.id, caller = %msg.sender, "action canceled");
            Ok(())
        })
    }

    pub(crate) fn run_guard(&mut self, info: &ActionInfo, hook: GuardHook) -> Result<(), CoreError> {
        let Some(guard) = self.guard(info.target, info.selector()) else {
            return Ok(());
        };
        // a guard address without code accepts everything
        let Some(code) = self.world.guards.get_mut(&guard) else {
            return Ok(());
        };

        let verdict = match hook {
            GuardHook::Creation => code.validate_action_creation(info),
            GuardHook::PreExecution => code.validate_pre_action_execution(info),
            GuardHook::PostExecution => code.validate_post_action_execution(info),
        };
        verdict.map_err(|reason| {
            warn!(id = %info.id, %guard, ?hook, %reason, "guard rejected action");
            CoreError::GuardRejected(reason)
        })
    }
}
