use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::SolCall;
use anyhow::{Context, Result};
use gavel_core::{
    signature::{domain_separator, sign_digest, typed_digest},
    utils::crypto::public_key_address,
    EcdsaSignature,
};
use gavel_types::{
    ActionInfo, CastApproval, CastDisapproval, CreateAction, IGavelCore, PermissionData,
};
use k256::ecdsa::SigningKey;

use crate::types::{CreateActionRequest, SignedPayload};

/// EIP-712 domain of a deployed core.
#[derive(Clone, Debug)]
pub struct Domain {
    pub name: String,
    pub chain_id: u64,
    pub core: Address,
}

impl Domain {
    pub fn separator(&self) -> B256 {
        domain_separator(&self.name, self.chain_id, self.core)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    Approval,
    Disapproval,
}

/// Parse a hex secp256k1 secret, with or without `0x`.
pub fn parse_signing_key(secret: &str) -> Result<SigningKey> {
    let secret = secret.trim();
    let bytes = hex::decode(secret.strip_prefix("0x").unwrap_or(secret))
        .context("private key is not hex")?;
    SigningKey::from_slice(&bytes).context("private key is not a valid secp256k1 scalar")
}

pub fn signer_address(key: &SigningKey) -> Address {
    public_key_address(key.verifying_key())
}

pub fn permission_id(target: Address, selector: FixedBytes<4>, strategy: Address) -> B256 {
    PermissionData {
        target,
        selector,
        strategy,
    }
    .permission_id()
}

pub fn sign_create_action(
    key: &SigningKey,
    domain: &Domain,
    request: &CreateActionRequest,
    nonce: U256,
) -> Result<SignedPayload> {
    let policyholder = signer_address(key);
    let message = CreateAction {
        policyholder,
        role: request.role,
        strategy: request.strategy,
        target: request.target,
        value: request.value,
        data: request.data.clone(),
        description: request.description.clone(),
        nonce,
    };
    let digest = typed_digest(domain.separator(), &message);
    let signature = sign_digest(key, digest)?;

    let calldata = IGavelCore::createActionBySigCall {
        policyholder,
        role: request.role,
        strategy: request.strategy,
        target: request.target,
        value: request.value,
        data: request.data.clone(),
        description: request.description.clone(),
        v: signature.v,
        r: signature.r,
        s: signature.s,
    }
    .abi_encode();

    Ok(payload(policyholder, nonce, digest, signature, calldata))
}

pub fn sign_vote(
    key: &SigningKey,
    domain: &Domain,
    vote: Vote,
    role: u8,
    info: &ActionInfo,
    reason: &str,
    nonce: U256,
) -> Result<SignedPayload> {
    let policyholder = signer_address(key);
    let digest = match vote {
        Vote::Approval => typed_digest(
            domain.separator(),
            &CastApproval {
                policyholder,
                role,
                actionInfo: info.clone(),
                reason: reason.to_owned(),
                nonce,
            },
        ),
        Vote::Disapproval => typed_digest(
            domain.separator(),
            &CastDisapproval {
                policyholder,
                role,
                actionInfo: info.clone(),
                reason: reason.to_owned(),
                nonce,
            },
        ),
    };
    let signature = sign_digest(key, digest)?;

    let calldata = match vote {
        Vote::Approval => IGavelCore::castApprovalBySigCall {
            policyholder,
            role,
            actionInfo: info.clone(),
            reason: reason.to_owned(),
            v: signature.v,
            r: signature.r,
            s: signature.s,
        }
        .abi_encode(),
        Vote::Disapproval => IGavelCore::castDisapprovalBySigCall {
            policyholder,
            role,
            actionInfo: info.clone(),
            reason: reason.to_owned(),
            v: signature.v,
            r: signature.r,
            s: signature.s,
        }
        .abi_encode(),
    };

    Ok(payload(policyholder, nonce, digest, signature, calldata))
}

fn payload(
    policyholder: Address,
    nonce: U256,
    digest: B256,
    signature: EcdsaSignature,
    calldata: Vec<u8>,
) -> SignedPayload {
    SignedPayload {
        policyholder,
        nonce,
        digest,
        v: signature.v,
        r: signature.r,
        s: signature.s,
        signature: Bytes::copy_from_slice(&signature.to_bytes()),
        calldata: calldata.into(),
    }
}
