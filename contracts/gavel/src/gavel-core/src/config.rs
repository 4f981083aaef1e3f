//! JSON configuration for bootstrapping a core instance.
//!
//! ```json
//! {
//!   "name": "Gavel",
//!   "address": "0x…",
//!   "executor": "0x…",
//!   "policy": "0x…",
//!   "chain_id": 1,
//!   "genesis_timestamp": 1700000000,
//!   "strategies": [
//!     { "kind": "relative_quorum", "approval_period": 172800, … }
//!   ],
//!   "accounts": ["treasury"]
//! }
//! ```

use std::path::{Path, PathBuf};

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::{
    engine::constants::{ABSOLUTE_QUORUM_LOGIC, RELATIVE_QUORUM_LOGIC},
    strategy::{AbsoluteQuorumConfig, RelativeQuorumConfig},
    utils::derive::strategy_address,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// EIP-712 domain name.
    pub name: String,
    pub address: Address,
    pub executor: Address,
    pub policy: Address,
    pub chain_id: u64,
    #[serde(default)]
    pub genesis_timestamp: u64,
    #[serde(default)]
    pub strategies: Vec<StrategyParams>,
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl CoreConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// A genesis strategy, tagged by the built-in logic that deploys it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyParams {
    RelativeQuorum(RelativeQuorumParams),
    AbsoluteQuorum(AbsoluteQuorumParams),
}

impl StrategyParams {
    pub fn logic(&self) -> Address {
        match self {
            StrategyParams::RelativeQuorum(_) => RELATIVE_QUORUM_LOGIC,
            StrategyParams::AbsoluteQuorum(_) => ABSOLUTE_QUORUM_LOGIC,
        }
    }

    /// ABI-encoded config as passed to `createStrategies`.
    pub fn encode(&self) -> Bytes {
        match self {
            StrategyParams::RelativeQuorum(params) => {
                RelativeQuorumConfig::from(params).abi_encode().into()
            }
            StrategyParams::AbsoluteQuorum(params) => {
                AbsoluteQuorumConfig::from(params).abi_encode().into()
            }
        }
    }

    /// Address the instance gets when deployed by the core at `core`.
    pub fn deployed_address(&self, core: Address) -> Address {
        strategy_address(core, self.logic(), &self.encode())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeQuorumParams {
    pub approval_period: u64,
    pub queuing_period: u64,
    pub expiration_period: u64,
    #[serde(default)]
    pub is_fixed_length_approval_period: bool,
    /// Basis points.
    pub min_approval_pct: u16,
    /// Basis points; above 10000 disables disapprovals.
    pub min_disapproval_pct: u16,
    pub approval_role: u8,
    pub disapproval_role: u8,
    #[serde(default)]
    pub force_approval_roles: Vec<u8>,
    #[serde(default)]
    pub force_disapproval_roles: Vec<u8>,
}

impl From<&RelativeQuorumParams> for RelativeQuorumConfig {
    fn from(params: &RelativeQuorumParams) -> Self {
        RelativeQuorumConfig {
            approvalPeriod: params.approval_period,
            queuingPeriod: params.queuing_period,
            expirationPeriod: params.expiration_period,
            isFixedLengthApprovalPeriod: params.is_fixed_length_approval_period,
            minApprovalPct: params.min_approval_pct,
            minDisapprovalPct: params.min_disapproval_pct,
            approvalRole: params.approval_role,
            disapprovalRole: params.disapproval_role,
            forceApprovalRoles: params.force_approval_roles.clone(),
            forceDisapprovalRoles: params.force_disapproval_roles.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteQuorumParams {
    pub approval_period: u64,
    pub queuing_period: u64,
    pub expiration_period: u64,
    #[serde(default)]
    pub is_fixed_length_approval_period: bool,
    /// Thresholds are `u64` in JSON: the tagged enum buffers its fields and cannot carry `u128`.
    pub min_approvals: u64,
    /// `None` disables disapprovals.
    #[serde(default)]
    pub min_disapprovals: Option<u64>,
    pub approval_role: u8,
    pub disapproval_role: u8,
    #[serde(default)]
    pub force_approval_roles: Vec<u8>,
    #[serde(default)]
    pub force_disapproval_roles: Vec<u8>,
}

impl From<&AbsoluteQuorumParams> for AbsoluteQuorumConfig {
    fn from(params: &AbsoluteQuorumParams) -> Self {
        AbsoluteQuorumConfig {
            approvalPeriod: params.approval_period,
            queuingPeriod: params.queuing_period,
            expirationPeriod: params.expiration_period,
            isFixedLengthApprovalPeriod: params.is_fixed_length_approval_period,
            minApprovals: u128::from(params.min_approvals),
            minDisapprovals: params.min_disapprovals.map_or(u128::MAX, u128::from),
            approvalRole: params.approval_role,
            disapprovalRole: params.disapproval_role,
            forceApprovalRoles: params.force_approval_roles.clone(),
            forceDisapprovalRoles: params.force_disapproval_roles.clone(),
        }
    }
}
