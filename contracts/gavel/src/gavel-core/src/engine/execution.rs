//! Executing queued actions and routing calls between contracts and the core.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolInterface, SolValue};
use gavel_types::{selector_of, ActionInfo, ActionState, IGavelCore::IGavelCoreCalls, PermissionOracle};
use tracing::{debug, info, warn};

use super::{lifecycle::GuardHook, GovernanceCore};
use crate::{
    dispatch::{CallContext, CallKind, Host},
    env::Msg,
    errors::CoreError,
    events::CoreEvent,
    signature::EcdsaSignature,
    storage::CoreStorage,
};

impl<P: PermissionOracle> GovernanceCore<P> {
    /// Executes a queued action and returns the target's return data.
    ///
    /// `msg.value` is credited to the executor, which forwards `info.value` to the target.
    pub fn execute_action(&mut self, msg: Msg, info: &ActionInfo) -> Result<Bytes, CoreError> {
        let outcome = self.atomically(|core| core.execute_action_inner(msg, info));
        if let Err(err) = &outcome {
            warn!(id = %info.id, %err, "action execution rejected");
        }
        outcome
    }

    fn execute_action_inner(&mut self, msg: Msg, info: &ActionInfo) -> Result<Bytes, CoreError> {
        let action = self.stored_action(info)?.clone();
        let current = self.action_state(info, &action)?;
        if self.storage.executing.contains(&info.id) || current != ActionState::Queued {
            return Err(CoreError::InvalidActionState {
                expected: ActionState::Queued,
                current,
            });
        }
        if action
            .min_execution_time
            .is_some_and(|min_execution_time| self.block.timestamp < min_execution_time)
        {
            return Err(CoreError::TimelockNotFinished);
        }
        if msg.value < info.value {
            return Err(CoreError::InsufficientMsgValue);
        }

        self.run_guard(info, GuardHook::PreExecution)?;

        let executor = self.storage.slot0.executor;
        self.credit(executor, msg.value);

        self.storage.executing.insert(info.id);
        let slot0 = self.storage.slot0;
        let dispatched = if action.is_script {
            self.delegate_call(info.target, info.value, &info.data)
        } else {
            self.call_contract(executor, info.target, info.value, &info.data)
        };
        self.storage.executing.remove(&info.id);

        if self.storage.slot0 != slot0 {
            warn!(id = %info.id, script = %info.target, "slot0 changed during script execution");
            return Err(CoreError::Slot0Changed);
        }
        let result = dispatched.map_err(CoreError::FailedActionExecution)?;

        self.run_guard(info, GuardHook::PostExecution)?;

        self.action_record_mut(info.id)?.executed = true;
        self.emit(CoreEvent::ActionExecuted {
            id: info.id,
            caller: msg.sender,
            strategy: info.strategy,
            creator: info.creator,
            result: result.clone(),
        });
        info!(id = %info.id, to = %info.target, is_script = action.is_script, "action executed");
        Ok(result)
    }

    /// Ordinary call from `from` to `to` moving `value`. Reverts roll back everything the callee
    /// did. An address without code accepts the call and returns nothing.
    pub(crate) fn call_contract(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Bytes, Bytes> {
        if to == self.address {
            return self.route(from, value, data);
        }

        self.atomically(|core| {
            core.transfer(from, to, value)?;
            let Some(mut code) = core.world.contracts.remove(&to) else {
                if core.world.busy.contains(&to) {
                    return Err(CoreError::ReentrantCall(to).into());
                }
                return Ok(Bytes::new());
            };

            core.world.busy.insert(to);
            let result = {
                let mut ctx = CallContext::new(core, to, from, value, CallKind::Call);
                code.call(&mut ctx, data)
            };
            core.world.busy.remove(&to);
            core.world.contracts.insert(to, code);
            result
        })
    }

    /// Runs `script` in the executor's context with the core as `msg.sender`.
    pub(crate) fn delegate_call(
        &mut self,
        script: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Bytes, Bytes> {
        self.atomically(|core| {
            let Some(mut code) = core.world.contracts.remove(&script) else {
                if core.world.busy.contains(&script) {
                    return Err(CoreError::ReentrantCall(script).into());
                }
                return Ok(Bytes::new());
            };

            let this = core.storage.slot0.executor;
            let sender = core.address;
            core.world.busy.insert(script);
            let result = {
                let mut ctx = CallContext::new(core, this, sender, value, CallKind::DelegateCall);
                code.call(&mut ctx, data)
            };
            core.world.busy.remove(&script);
            core.world.contracts.insert(script, code);
            result
        })
    }

    /// Decodes a call made to the core's own address and runs the matching entry point.
    fn route(&mut self, from: Address, value: U256, data: &[u8]) -> Result<Bytes, Bytes> {
        self.atomically(|core| {
            let call = IGavelCoreCalls::abi_decode(data, true)
                .map_err(|_| CoreError::UnknownSelector(selector_of(data)))?;
            core.debit(from, value)?;
            // only executeAction is payable; value sent anywhere else stays with the core
            if !matches!(call, IGavelCoreCalls::executeAction(_)) {
                core.credit(core.address, value);
            }
            debug!(%from, selector = %selector_of(data), "call routed to core");
            core.dispatch_abi(Msg { sender: from, value }, call)
        })
        .map_err(Bytes::from)
    }

    fn dispatch_abi(&mut self, msg: Msg, call: IGavelCoreCalls) -> Result<Bytes, CoreError> {
        use IGavelCoreCalls as C;

        Ok(match call {
            C::createAction(c) => self
                .create_action(msg, c.role, c.strategy, c.target, c.value, c.data, &c.description)?
                .abi_encode()
                .into(),
            C::createActionBySig(c) => self
                .create_action_by_sig(
                    c.policyholder,
                    c.role,
                    c.strategy,
                    c.target,
                    c.value,
                    c.data,
                    &c.description,
                    EcdsaSignature::new(c.v, c.r, c.s),
                )?
                .abi_encode()
                .into(),
            C::castApproval(c) => self
                .cast_approval(msg, c.role, &c.actionInfo, &c.reason)?
                .abi_encode()
                .into(),
            C::castApprovalBySig(c) => self
                .cast_approval_by_sig(
                    c.policyholder,
                    c.role,
                    &c.actionInfo,
                    &c.reason,
                    EcdsaSignature::new(c.v, c.r, c.s),
                )?
                .abi_encode()
                .into(),
            C::castDisapproval(c) => self
                .cast_disapproval(msg, c.role, &c.actionInfo, &c.reason)?
                .abi_encode()
                .into(),
            C::castDisapprovalBySig(c) => self
                .cast_disapproval_by_sig(
                    c.policyholder,
                    c.role,
                    &c.actionInfo,
                    &c.reason,
                    EcdsaSignature::new(c.v, c.r, c.s),
                )?
                .abi_encode()
                .into(),
            C::queueAction(c) => {
                self.queue_action(msg, &c.actionInfo)?;
                Bytes::new()
            }
            C::executeAction(c) => self.execute_action(msg, &c.actionInfo)?.abi_encode().into(),
            C::cancelAction(c) => {
                self.cancel_action(msg, &c.actionInfo)?;
                Bytes::new()
            }
            // uint8 return word; `SolValue` has no bare `u8`
            C::getActionState(c) => U256::from(u8::from(self.get_action_state(&c.actionInfo)?))
                .abi_encode()
                .into(),
            C::incrementNonce(c) => {
                self.increment_nonce(msg, c.selector);
                Bytes::new()
            }
            C::createStrategies(c) => {
                self.create_strategies(msg, c.logic, &c.configs)?;
                Bytes::new()
            }
            C::authorizeStrategies(c) => {
                self.authorize_strategies(msg, &c.strategies)?;
                Bytes::new()
            }
            C::unauthorizeStrategies(c) => {
                self.unauthorize_strategies(msg, &c.strategies)?;
                Bytes::new()
            }
            C::setStrategyLogicAuthorization(c) => {
                self.set_strategy_logic_authorization(msg, c.logic, c.authorized)?;
                Bytes::new()
            }
            C::authorizeScript(c) => {
                self.authorize_script(msg, c.script, c.authorized)?;
                Bytes::new()
            }
            C::setGuard(c) => {
                self.set_guard(msg, c.target, c.selector, c.guard)?;
                Bytes::new()
            }
            C::createAccounts(c) => {
                self.create_accounts(msg, &c.names)?;
                Bytes::new()
            }
        })
    }
}

impl<P: PermissionOracle> Host for GovernanceCore<P> {
    fn block_timestamp(&self) -> u64 {
        self.block.timestamp
    }

    fn call(&mut self, from: Address, to: Address, value: U256, data: &[u8]) -> Result<Bytes, Bytes> {
        self.call_contract(from, to, value, data)
    }

    fn storage_mut(&mut self) -> &mut CoreStorage {
        &mut self.storage
    }
}
