use alloy_primitives::{Address, U256};

/// Block context visible to the core and to dispatched contracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEnv {
    pub timestamp: u64,
    pub chain_id: u64,
}

/// Caller context of an entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Msg {
    pub sender: Address,
    pub value: U256,
}

impl Msg {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}
