//! Contracts the core can call, and the context they run in.
//!
//! A target is either called normally (its own context, `msg.sender` is the executor) or, when it
//! is an authorized script, delegate-called: it then runs as the executor, sees the core as
//! `msg.sender` and gets write access to the core's storage.

use alloy_primitives::{Address, Bytes, U256};

use crate::storage::CoreStorage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Call,
    DelegateCall,
}

/// Code deployed at an address. Returns the call's output, or revert data.
pub trait Contract: ContractClone {
    fn call(&mut self, ctx: &mut CallContext<'_>, data: &[u8]) -> Result<Bytes, Bytes>;
}

pub trait ContractClone {
    fn clone_box(&self) -> Box<dyn Contract>;
}

impl<T> ContractClone for T
where
    T: Contract + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// What a running contract can reach on the host.
pub(crate) trait Host {
    fn block_timestamp(&self) -> u64;

    fn call(&mut self, from: Address, to: Address, value: U256, data: &[u8]) -> Result<Bytes, Bytes>;

    fn storage_mut(&mut self) -> &mut CoreStorage;
}

pub struct CallContext<'a> {
    host: &'a mut dyn Host,
    this: Address,
    sender: Address,
    value: U256,
    kind: CallKind,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        host: &'a mut dyn Host,
        this: Address,
        sender: Address,
        value: U256,
        kind: CallKind,
    ) -> Self {
        Self {
            host,
            this,
            sender,
            value,
            kind,
        }
    }

    /// Address whose context the code runs in.
    pub fn this(&self) -> Address {
        self.this
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    pub fn block_timestamp(&self) -> u64 {
        self.host.block_timestamp()
    }

    /// Calls `to` from `this`, moving `value` out of `this`'s balance. Calls to the core address
    /// are decoded against `IGavelCore`.
    pub fn call(&mut self, to: Address, value: U256, data: &[u8]) -> Result<Bytes, Bytes> {
        self.host.call(self.this, to, value, data)
    }

    /// Core storage, reachable only from a delegated script.
    pub fn storage_mut(&mut self) -> Option<&mut CoreStorage> {
        match self.kind {
            CallKind::DelegateCall => Some(self.host.storage_mut()),
            CallKind::Call => None,
        }
    }
}
