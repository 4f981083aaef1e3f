//! Persistent state of the core and of the modeled chain around it.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, FixedBytes, U256};
use gavel_types::{Action, ActionGuard, Strategy, StrategyLogic};

use crate::dispatch::Contract;

/// First storage slot of the core. Scripts run with write access to it, so the core compares it
/// before and after every script execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub executor: Address,
    pub policy: Address,
}

/// Core storage. Cloned as a whole to checkpoint an entry point.
#[derive(Clone, Default)]
pub struct CoreStorage {
    pub(crate) slot0: Slot0,
    pub(crate) action_count: U256,
    pub(crate) actions: BTreeMap<U256, Action>,
    pub(crate) approvals: BTreeSet<(U256, Address)>,
    pub(crate) disapprovals: BTreeSet<(U256, Address)>,
    pub(crate) nonces: BTreeMap<(Address, FixedBytes<4>), U256>,
    pub(crate) strategies: BTreeMap<Address, Box<dyn Strategy>>,
    pub(crate) authorized_strategies: BTreeSet<Address>,
    pub(crate) authorized_strategy_logics: BTreeSet<Address>,
    pub(crate) authorized_scripts: BTreeSet<Address>,
    pub(crate) guards: BTreeMap<(Address, FixedBytes<4>), Address>,
    pub(crate) accounts: BTreeMap<Address, String>,
    /// Actions whose dispatch is in flight.
    pub(crate) executing: BTreeSet<U256>,
}

impl CoreStorage {
    pub fn slot0(&self) -> Slot0 {
        self.slot0
    }

    /// Writable only from a delegated script.
    pub fn slot0_mut(&mut self) -> &mut Slot0 {
        &mut self.slot0
    }

    pub fn action(&self, id: U256) -> Option<&Action> {
        self.actions.get(&id)
    }

    pub fn action_mut(&mut self, id: U256) -> Option<&mut Action> {
        self.actions.get_mut(&id)
    }
}

/// Code and balances of every other address the core talks to.
#[derive(Clone, Default)]
pub(crate) struct World {
    pub(crate) contracts: BTreeMap<Address, Box<dyn Contract>>,
    pub(crate) guards: BTreeMap<Address, Box<dyn ActionGuard>>,
    pub(crate) strategy_logics: BTreeMap<Address, Box<dyn StrategyLogic>>,
    pub(crate) balances: BTreeMap<Address, U256>,
    /// Contracts currently on the call stack.
    pub(crate) busy: BTreeSet<Address>,
}

impl World {
    pub(crate) fn has_code(&self, address: Address) -> bool {
        self.contracts.contains_key(&address)
            || self.busy.contains(&address)
            || self.guards.contains_key(&address)
            || self.strategy_logics.contains_key(&address)
    }
}
