//! Gavel governance core.
//!
//! Policyholders propose actions (a call to a target with value and calldata), vote on them
//! through a pluggable strategy, queue the approved ones behind a timelock and finally execute
//! them through the executor. Targets flagged as scripts run in the executor's own context
//! instead. Every state-changing entry point is atomic: on error the core is left untouched.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod env;
pub mod errors;
pub mod events;
pub mod policy;
pub mod signature;
pub mod state;
pub mod storage;
pub mod strategy;
pub mod utils;

pub use crate::config::{CoreConfig, StrategyParams};
pub use crate::engine::GovernanceCore;
pub use crate::dispatch::{CallContext, CallKind, Contract};
pub use crate::env::{BlockEnv, Msg};
pub use crate::errors::CoreError;
pub use crate::events::CoreEvent;
pub use crate::policy::RolePolicy;
pub use crate::signature::EcdsaSignature;
pub use crate::storage::{CoreStorage, Slot0};
