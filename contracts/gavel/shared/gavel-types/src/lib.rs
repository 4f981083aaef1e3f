//! Shared types for the Gavel governance core.
//!
//! Used by the engine (`gavel-core`) and by off-chain tooling (`gavel-signer`) so both sides agree
//! on the ABI surface, on how actions are identified, and on the seams a strategy, a guard or a
//! permission oracle plugs into.

pub mod abi;
pub mod action;
pub mod guard;
pub mod oracle;
pub mod strategy;

pub use abi::{ActionInfo, CastApproval, CastDisapproval, CreateAction, IGavelCore, PermissionData};
pub use action::{selector_of, Action, ActionState};
pub use guard::{ActionGuard, ActionGuardClone};
pub use oracle::{PermissionOracle, RoleGrant};
pub use strategy::{Strategy, StrategyClone, StrategyError, StrategyLogic, StrategyLogicClone};
