//! The governance engine.
//!
//! `GovernanceCore` owns its storage and the modeled world around it (deployed contracts, guards,
//! strategy logics and balances). Entry points are split by concern:
//! - `lifecycle`: create, cast, queue, cancel, state queries
//! - `execution`: execute and call dispatch
//! - `signed`: signature-authorized variants and nonces
//! - `admin`: executor-only configuration

pub mod constants;

mod admin;
mod execution;
mod lifecycle;
mod signed;

use alloy_primitives::{Address, FixedBytes, B256, U256};
use gavel_types::{
    Action, ActionGuard, ActionInfo, ActionState, PermissionOracle, Strategy, StrategyLogic,
};
use tracing::{debug, info};

use crate::{
    config::CoreConfig,
    dispatch::Contract,
    env::BlockEnv,
    errors::CoreError,
    events::CoreEvent,
    signature,
    state::derive_action_state,
    storage::{CoreStorage, Slot0, World},
    strategy::{AbsoluteQuorumLogic, RelativeQuorumLogic},
};
use constants::{ABSOLUTE_QUORUM_LOGIC, RELATIVE_QUORUM_LOGIC};

pub struct GovernanceCore<P> {
    address: Address,
    name: String,
    block: BlockEnv,
    domain_separator: B256,
    policy: P,
    storage: CoreStorage,
    world: World,
    /// Append-only; an entry point that fails truncates it back.
    events: Vec<CoreEvent>,
}

impl<P: PermissionOracle> GovernanceCore<P> {
    /// An empty core: no strategy logics, strategies or accounts.
    pub fn new(
        name: impl Into<String>,
        address: Address,
        slot0: Slot0,
        block: BlockEnv,
        policy: P,
    ) -> Self {
        let name = name.into();
        let domain_separator = signature::domain_separator(&name, block.chain_id, address);
        Self {
            address,
            name,
            block,
            domain_separator,
            policy,
            storage: CoreStorage {
                slot0,
                ..CoreStorage::default()
            },
            world: World::default(),
            events: Vec::new(),
        }
    }

    /// Bootstraps a core from config: deploys and authorizes the built-in strategy logics, then
    /// the genesis strategies and accounts.
    pub fn initialize(config: &CoreConfig, policy: P) -> Result<Self, CoreError> {
        let mut core = Self::new(
            config.name.clone(),
            config.address,
            Slot0 {
                executor: config.executor,
                policy: config.policy,
            },
            BlockEnv {
                timestamp: config.genesis_timestamp,
                chain_id: config.chain_id,
            },
            policy,
        );

        core.deploy_strategy_logic(RELATIVE_QUORUM_LOGIC, Box::new(RelativeQuorumLogic))?;
        core.deploy_strategy_logic(ABSOLUTE_QUORUM_LOGIC, Box::new(AbsoluteQuorumLogic))?;
        for logic in [RELATIVE_QUORUM_LOGIC, ABSOLUTE_QUORUM_LOGIC] {
            core.set_strategy_logic_authorized(logic, true);
        }
        for params in &config.strategies {
            core.deploy_strategy(params.logic(), &params.encode())?;
        }
        for name in &config.accounts {
            core.deploy_account(name)?;
        }

        info!(
            core = %core.address,
            executor = %config.executor,
            strategies = config.strategies.len(),
            accounts = config.accounts.len(),
            "governance core initialized"
        );
        Ok(core)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn block(&self) -> BlockEnv {
        self.block
    }

    pub fn domain_separator(&self) -> B256 {
        self.domain_separator
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The role registry lives outside the core; changes here model role grants made through it.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn slot0(&self) -> Slot0 {
        self.storage.slot0
    }

    pub fn executor(&self) -> Address {
        self.storage.slot0.executor
    }

    pub fn action_count(&self) -> U256 {
        self.storage.action_count
    }

    pub fn action(&self, id: U256) -> Option<&Action> {
        self.storage.actions.get(&id)
    }

    pub fn has_approved(&self, id: U256, policyholder: Address) -> bool {
        self.storage.approvals.contains(&(id, policyholder))
    }

    pub fn has_disapproved(&self, id: U256, policyholder: Address) -> bool {
        self.storage.disapprovals.contains(&(id, policyholder))
    }

    pub fn nonce(&self, policyholder: Address, selector: FixedBytes<4>) -> U256 {
        self.storage
            .nonces
            .get(&(policyholder, selector))
            .copied()
            .unwrap_or_default()
    }

    pub fn strategy(&self, strategy: Address) -> Option<&dyn Strategy> {
        self.storage.strategies.get(&strategy).map(|s| s.as_ref())
    }

    pub fn is_strategy_authorized(&self, strategy: Address) -> bool {
        self.storage.authorized_strategies.contains(&strategy)
    }

    pub fn is_strategy_logic_authorized(&self, logic: Address) -> bool {
        self.storage.authorized_strategy_logics.contains(&logic)
    }

    pub fn is_script_authorized(&self, script: Address) -> bool {
        self.storage.authorized_scripts.contains(&script)
    }

    pub fn guard(&self, target: Address, selector: FixedBytes<4>) -> Option<Address> {
        self.storage.guards.get(&(target, selector)).copied()
    }

    /// Name of the account deployed at `account`.
    pub fn account(&self, account: Address) -> Option<&str> {
        self.storage.accounts.get(&account).map(String::as_str)
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.world
            .balances
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    pub fn events(&self) -> &[CoreEvent] {
        &self.events
    }

    /// Advances the clock.
    pub fn warp(&mut self, timestamp: u64) {
        self.block.timestamp = timestamp;
    }

    /// Mints native value to an account outside of any entry point.
    pub fn deal(&mut self, account: Address, amount: U256) {
        self.credit(account, amount);
    }

    pub fn deploy_contract(
        &mut self,
        address: Address,
        code: Box<dyn Contract>,
    ) -> Result<(), CoreError> {
        self.ensure_undeployed(address)?;
        self.world.contracts.insert(address, code);
        debug!(%address, "contract deployed");
        Ok(())
    }

    pub fn deploy_guard(
        &mut self,
        address: Address,
        code: Box<dyn ActionGuard>,
    ) -> Result<(), CoreError> {
        self.ensure_undeployed(address)?;
        self.world.guards.insert(address, code);
        debug!(%address, "guard deployed");
        Ok(())
    }

    /// Deploys strategy logic code. It still needs `setStrategyLogicAuthorization` to be used.
    pub fn deploy_strategy_logic(
        &mut self,
        address: Address,
        code: Box<dyn StrategyLogic>,
    ) -> Result<(), CoreError> {
        self.ensure_undeployed(address)?;
        self.world.strategy_logics.insert(address, code);
        debug!(%address, "strategy logic deployed");
        Ok(())
    }

    /// Derived state of an action. Pure: never mutates anything.
    pub fn get_action_state(&self, info: &ActionInfo) -> Result<ActionState, CoreError> {
        let action = self.stored_action(info)?;
        self.action_state(info, action)
    }

    fn ensure_undeployed(&self, address: Address) -> Result<(), CoreError> {
        if address == self.address
            || self.world.has_code(address)
            || self.storage.strategies.contains_key(&address)
            || self.storage.accounts.contains_key(&address)
        {
            return Err(CoreError::DuplicateDeployment(address));
        }
        Ok(())
    }

    /// Runs `f` against a checkpoint; on error, storage and world are restored and the events
    /// emitted since the checkpoint are dropped.
    pub(crate) fn atomically<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let storage = self.storage.clone();
        let world = self.world.clone();
        let emitted = self.events.len();
        let result = f(self);
        if result.is_err() {
            self.storage = storage;
            self.world = world;
            self.events.truncate(emitted);
        }
        result
    }

    pub(crate) fn emit(&mut self, event: CoreEvent) {
        debug!(?event, "event");
        self.events.push(event);
    }

    /// Stored record for `info`, after checking the info hash.
    pub(crate) fn stored_action(&self, info: &ActionInfo) -> Result<&Action, CoreError> {
        match self.storage.actions.get(&info.id) {
            Some(action) if action.info_hash == info.info_hash() => Ok(action),
            _ => Err(CoreError::InfoHashMismatch),
        }
    }

    pub(crate) fn action_record_mut(&mut self, id: U256) -> Result<&mut Action, CoreError> {
        self.storage
            .actions
            .get_mut(&id)
            .ok_or(CoreError::InfoHashMismatch)
    }

    pub(crate) fn strategy_of(&self, strategy: Address) -> Result<&dyn Strategy, CoreError> {
        self.strategy(strategy)
            .ok_or(CoreError::UnknownStrategy(strategy))
    }

    pub(crate) fn action_state(
        &self,
        info: &ActionInfo,
        action: &Action,
    ) -> Result<ActionState, CoreError> {
        let strategy = self.strategy_of(info.strategy)?;
        Ok(derive_action_state(
            strategy,
            info,
            action,
            self.block.timestamp,
        ))
    }

    pub(crate) fn credit(&mut self, account: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let balance = self.world.balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub(crate) fn debit(&mut self, account: Address, amount: U256) -> Result<(), CoreError> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.world.balances.entry(account).or_default();
        if *balance < amount {
            return Err(CoreError::InsufficientBalance(account));
        }
        *balance -= amount;
        Ok(())
    }

    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CoreError> {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }
}
