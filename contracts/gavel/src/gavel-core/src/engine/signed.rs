//! Signature-authorized entry points and per-selector nonces.
//!
//! Each `*BySig` operation verifies an EIP-712 signature from `policyholder` over the operation's
//! parameters and the policyholder's current nonce for that operation's selector, bumps the
//! nonce, then runs the ordinary path as if `policyholder` were the caller.

use alloy_primitives::{Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::SolCall;
use gavel_types::{
    ActionInfo, CastApproval, CastDisapproval, CreateAction, IGavelCore, PermissionOracle,
};
use tracing::debug;

use super::{lifecycle::Vote, GovernanceCore};
use crate::{
    env::Msg,
    errors::CoreError,
    events::CoreEvent,
    signature::{self, EcdsaSignature},
};

pub(crate) const CREATE_ACTION_SELECTOR: FixedBytes<4> =
    FixedBytes(IGavelCore::createActionBySigCall::SELECTOR);
pub(crate) const CAST_APPROVAL_SELECTOR: FixedBytes<4> =
    FixedBytes(IGavelCore::castApprovalBySigCall::SELECTOR);
pub(crate) const CAST_DISAPPROVAL_SELECTOR: FixedBytes<4> =
    FixedBytes(IGavelCore::castDisapprovalBySigCall::SELECTOR);

impl<P: PermissionOracle> GovernanceCore<P> {
    #[allow(clippy::too_many_arguments)]
    pub fn create_action_by_sig(
        &mut self,
        policyholder: Address,
        role: u8,
        strategy: Address,
        target: Address,
        value: U256,
        data: Bytes,
        description: &str,
        signature: EcdsaSignature,
    ) -> Result<U256, CoreError> {
        self.atomically(|core| {
            let digest = core.create_action_digest(
                policyholder,
                role,
                strategy,
                target,
                value,
                data.clone(),
                description,
            );
            core.consume_signature(policyholder, CREATE_ACTION_SELECTOR, digest, &signature)?;
            core.create_action_for(policyholder, role, strategy, target, value, data, description)
        })
    }

    pub fn cast_approval_by_sig(
        &mut self,
        policyholder: Address,
        role: u8,
        info: &ActionInfo,
        reason: &str,
        signature: EcdsaSignature,
    ) -> Result<u128, CoreError> {
        self.atomically(|core| {
            let digest = core.cast_approval_digest(policyholder, role, info, reason);
            core.consume_signature(policyholder, CAST_APPROVAL_SELECTOR, digest, &signature)?;
            core.cast_vote(Vote::Approval, policyholder, role, info, reason)
        })
    }

    pub fn cast_disapproval_by_sig(
        &mut self,
        policyholder: Address,
        role: u8,
        info: &ActionInfo,
        reason: &str,
        signature: EcdsaSignature,
    ) -> Result<u128, CoreError> {
        self.atomically(|core| {
            let digest = core.cast_disapproval_digest(policyholder, role, info, reason);
            core.consume_signature(policyholder, CAST_DISAPPROVAL_SELECTOR, digest, &signature)?;
            core.cast_vote(Vote::Disapproval, policyholder, role, info, reason)
        })
    }

    /// Invalidates every outstanding signature of `msg.sender` for `selector`.
    pub fn increment_nonce(&mut self, msg: Msg, selector: FixedBytes<4>) {
        let nonce = self.bump_nonce(msg.sender, selector);
        self.emit(CoreEvent::NonceIncremented {
            policyholder: msg.sender,
            selector,
            nonce,
        });
    }

    /// Digest `policyholder` must sign for `createActionBySig` at their current nonce.
    #[allow(clippy::too_many_arguments)]
    pub fn create_action_digest(
        &self,
        policyholder: Address,
        role: u8,
        strategy: Address,
        target: Address,
        value: U256,
        data: Bytes,
        description: &str,
    ) -> B256 {
        let message = CreateAction {
            policyholder,
            role,
            strategy,
            target,
            value,
            data,
            description: description.to_owned(),
            nonce: self.nonce(policyholder, CREATE_ACTION_SELECTOR),
        };
        signature::typed_digest(self.domain_separator, &message)
    }

    pub fn cast_approval_digest(
        &self,
        policyholder: Address,
        role: u8,
        info: &ActionInfo,
        reason: &str,
    ) -> B256 {
        let message = CastApproval {
            policyholder,
            role,
            actionInfo: info.clone(),
            reason: reason.to_owned(),
            nonce: self.nonce(policyholder, CAST_APPROVAL_SELECTOR),
        };
        signature::typed_digest(self.domain_separator, &message)
    }

    pub fn cast_disapproval_digest(
        &self,
        policyholder: Address,
        role: u8,
        info: &ActionInfo,
        reason: &str,
    ) -> B256 {
        let message = CastDisapproval {
            policyholder,
            role,
            actionInfo: info.clone(),
            reason: reason.to_owned(),
            nonce: self.nonce(policyholder, CAST_DISAPPROVAL_SELECTOR),
        };
        signature::typed_digest(self.domain_separator, &message)
    }

    fn consume_signature(
        &mut self,
        policyholder: Address,
        selector: FixedBytes<4>,
        digest: B256,
        signature: &EcdsaSignature,
    ) -> Result<(), CoreError> {
        signature::verify(digest, signature, policyholder)?;
        self.bump_nonce(policyholder, selector);
        debug!(%policyholder, %selector, "signature consumed");
        Ok(())
    }

    fn bump_nonce(&mut self, policyholder: Address, selector: FixedBytes<4>) -> U256 {
        let nonce = self
            .storage
            .nonces
            .entry((policyholder, selector))
            .or_default();
        *nonce = nonce.saturating_add(U256::from(1u64));
        *nonce
    }
}
