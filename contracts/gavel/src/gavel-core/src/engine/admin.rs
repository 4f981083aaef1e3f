//! Executor-only configuration: strategies, strategy logics, scripts, guards and accounts.
//!
//! These are reached by executing an action that targets the core (or through a script running
//! as the executor).

use alloy_primitives::{Address, Bytes, FixedBytes};
use gavel_types::PermissionOracle;
use tracing::info;

use super::GovernanceCore;
use crate::{env::Msg, errors::CoreError, events::CoreEvent, utils::derive};

impl<P: PermissionOracle> GovernanceCore<P> {
    /// Deploys and authorizes one strategy per config; returns their addresses in order.
    pub fn create_strategies(
        &mut self,
        msg: Msg,
        logic: Address,
        configs: &[Bytes],
    ) -> Result<Vec<Address>, CoreError> {
        self.atomically(|core| {
            core.only_governance(&msg)?;
            configs
                .iter()
                .map(|config| core.deploy_strategy(logic, config))
                .collect()
        })
    }

    pub fn authorize_strategies(
        &mut self,
        msg: Msg,
        strategies: &[Address],
    ) -> Result<(), CoreError> {
        self.atomically(|core| {
            core.only_governance(&msg)?;
            for &strategy in strategies {
                if !core.storage.strategies.contains_key(&strategy) {
                    return Err(CoreError::UnknownStrategy(strategy));
                }
                core.storage.authorized_strategies.insert(strategy);
                core.emit(CoreEvent::StrategyAuthorized { strategy });
                info!(%strategy, "strategy authorized");
            }
            Ok(())
        })
    }

    /// New actions can no longer use these strategies; existing actions keep theirs.
    pub fn unauthorize_strategies(
        &mut self,
        msg: Msg,
        strategies: &[Address],
    ) -> Result<(), CoreError> {
        self.atomically(|core| {
            core.only_governance(&msg)?;
            for &strategy in strategies {
                if !core.storage.strategies.contains_key(&strategy) {
                    return Err(CoreError::UnknownStrategy(strategy));
                }
                core.storage.authorized_strategies.remove(&strategy);
                core.emit(CoreEvent::StrategyUnauthorized { strategy });
                info!(%strategy, "strategy unauthorized");
            }
            Ok(())
        })
    }

    pub fn set_strategy_logic_authorization(
        &mut self,
        msg: Msg,
        logic: Address,
        authorized: bool,
    ) -> Result<(), CoreError> {
        self.only_governance(&msg)?;
        self.set_strategy_logic_authorized(logic, authorized);
        Ok(())
    }

    /// Actions targeting an authorized script created from now on run it via delegate call.
    pub fn authorize_script(
        &mut self,
        msg: Msg,
        script: Address,
        authorized: bool,
    ) -> Result<(), CoreError> {
        self.only_governance(&msg)?;
        self.ensure_not_self(script)?;
        if authorized {
            self.storage.authorized_scripts.insert(script);
        } else {
            self.storage.authorized_scripts.remove(&script);
        }
        self.emit(CoreEvent::ScriptAuthorized { script, authorized });
        info!(%script, authorized, "script authorization set");
        Ok(())
    }

    /// Sets the guard for `(target, selector)`; the zero address removes it.
    pub fn set_guard(
        &mut self,
        msg: Msg,
        target: Address,
        selector: FixedBytes<4>,
        guard: Address,
    ) -> Result<(), CoreError> {
        self.only_governance(&msg)?;
        self.ensure_not_self(target)?;
        if guard == Address::ZERO {
            self.storage.guards.remove(&(target, selector));
        } else {
            self.storage.guards.insert((target, selector), guard);
        }
        self.emit(CoreEvent::ActionGuardSet {
            target,
            selector,
            guard,
        });
        info!(%target, %selector, %guard, "action guard set");
        Ok(())
    }

    pub fn create_accounts(&mut self, msg: Msg, names: &[String]) -> Result<Vec<Address>, CoreError> {
        self.atomically(|core| {
            core.only_governance(&msg)?;
            names.iter().map(|name| core.deploy_account(name)).collect()
        })
    }

    pub(crate) fn deploy_strategy(&mut self, logic: Address, config: &[u8]) -> Result<Address, CoreError> {
        if !self.storage.authorized_strategy_logics.contains(&logic) {
            return Err(CoreError::UnauthorizedStrategyLogic);
        }
        let code = self
            .world
            .strategy_logics
            .get(&logic)
            .ok_or(CoreError::UnauthorizedStrategyLogic)?;

        let strategy = derive::strategy_address(self.address, logic, config);
        if self.storage.strategies.contains_key(&strategy) {
            return Err(CoreError::DuplicateDeployment(strategy));
        }
        let instance = code.deploy(config)?;

        self.storage.strategies.insert(strategy, instance);
        self.storage.authorized_strategies.insert(strategy);
        self.emit(CoreEvent::StrategyCreated {
            strategy,
            logic,
            config: Bytes::copy_from_slice(config),
        });
        self.emit(CoreEvent::StrategyAuthorized { strategy });
        info!(%strategy, %logic, "strategy deployed");
        Ok(strategy)
    }

    pub(crate) fn deploy_account(&mut self, name: &str) -> Result<Address, CoreError> {
        let account = derive::account_address(self.address, name);
        self.ensure_undeployed(account)?;
        self.storage.accounts.insert(account, name.to_owned());
        self.emit(CoreEvent::AccountCreated {
            account,
            name: name.to_owned(),
        });
        info!(%account, account_name = name, "account created");
        Ok(account)
    }

    pub(crate) fn set_strategy_logic_authorized(&mut self, logic: Address, authorized: bool) {
        if authorized {
            self.storage.authorized_strategy_logics.insert(logic);
        } else {
            self.storage.authorized_strategy_logics.remove(&logic);
        }
        self.emit(CoreEvent::StrategyLogicAuthorized { logic, authorized });
        info!(%logic, authorized, "strategy logic authorization set");
    }

    fn only_governance(&self, msg: &Msg) -> Result<(), CoreError> {
        if msg.sender != self.storage.slot0.executor {
            return Err(CoreError::OnlyGovernanceInstance);
        }
        Ok(())
    }

    fn ensure_not_self(&self, target: Address) -> Result<(), CoreError> {
        if target == self.address || target == self.storage.slot0.policy {
            return Err(CoreError::CannotTargetSelf);
        }
        Ok(())
    }
}
