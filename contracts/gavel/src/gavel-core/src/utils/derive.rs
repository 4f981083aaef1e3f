//! Deterministic addresses for instances the core deploys.

use alloy_primitives::{keccak256, Address};

/// `keccak256(core ‖ logic ‖ keccak256(config))[12..]`
pub fn strategy_address(core: Address, logic: Address, config: &[u8]) -> Address {
    let config_hash = keccak256(config);
    let mut buf = Vec::with_capacity(20 + 20 + 32);
    buf.extend_from_slice(core.as_slice());
    buf.extend_from_slice(logic.as_slice());
    buf.extend_from_slice(config_hash.as_slice());
    Address::from_slice(&keccak256(buf)[12..])
}

/// `keccak256(core ‖ "account" ‖ name)[12..]`
pub fn account_address(core: Address, name: &str) -> Address {
    let mut buf = Vec::with_capacity(20 + 7 + name.len());
    buf.extend_from_slice(core.as_slice());
    buf.extend_from_slice(b"account");
    buf.extend_from_slice(name.as_bytes());
    Address::from_slice(&keccak256(buf)[12..])
}
