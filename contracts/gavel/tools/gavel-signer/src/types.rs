use alloy_primitives::{Address, Bytes, B256, U256};
use gavel_types::ActionInfo;
use serde::{Deserialize, Serialize};

/// An action as stored off-chain by whoever created it; fed back to every vote.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ActionJson {
    pub id: U256,
    pub creator: Address,
    pub creator_role: u8,
    pub strategy: Address,
    pub target: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

impl From<ActionJson> for ActionInfo {
    fn from(action: ActionJson) -> Self {
        ActionInfo {
            id: action.id,
            creator: action.creator,
            creatorRole: action.creator_role,
            strategy: action.strategy,
            target: action.target,
            value: action.value,
            data: action.data,
        }
    }
}

/// Parameters of a `createActionBySig` request. The policyholder is the signing key.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateActionRequest {
    pub role: u8,
    pub strategy: Address,
    pub target: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub description: String,
}

/// What gets handed to a relayer.
#[derive(Clone, Debug, Serialize)]
pub struct SignedPayload {
    pub policyholder: Address,
    pub nonce: U256,
    pub digest: B256,
    pub v: u8,
    pub r: B256,
    pub s: B256,
    /// `r ‖ s ‖ v`
    pub signature: Bytes,
    /// Ready-to-send calldata for the matching `*BySig` function.
    pub calldata: Bytes,
}

#[derive(Debug, Serialize)]
pub struct SignedOutput {
    #[serde(flatten)]
    pub payload: SignedPayload,
    pub signed_at: String,
}
