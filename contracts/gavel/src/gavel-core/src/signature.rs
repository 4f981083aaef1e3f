//! EIP-712 digests for the `*BySig` entry points.
//!
//! Domain: `EIP712Domain(string name,uint256 chainId,address verifyingContract)`, with the core's
//! name, the chain id and the core's address. Messages are the `CreateAction`, `CastApproval` and
//! `CastDisapproval` structs from `gavel_types::abi`.

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolStruct;
use k256::ecdsa::SigningKey;

use crate::{errors::CoreError, utils::crypto::ecrecover_address};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl EcdsaSignature {
    pub fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }

    /// `r ‖ s ‖ v`
    pub fn from_bytes(sig: &[u8; 65]) -> Self {
        Self {
            v: sig[64],
            r: B256::from_slice(&sig[..32]),
            s: B256::from_slice(&sig[32..64]),
        }
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }
}

pub fn domain_separator(name: &str, chain_id: u64, verifying_contract: Address) -> B256 {
    let domain_type_hash =
        keccak256(b"EIP712Domain(string name,uint256 chainId,address verifyingContract)");
    let name_hash = keccak256(name.as_bytes());

    let mut buf = Vec::with_capacity(32 * 4);
    buf.extend_from_slice(domain_type_hash.as_slice());
    buf.extend_from_slice(name_hash.as_slice());
    buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    let mut contract_padded = [0u8; 32];
    contract_padded[12..32].copy_from_slice(verifying_contract.as_slice());
    buf.extend_from_slice(&contract_padded);
    keccak256(buf)
}

/// `keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(message))`
pub fn typed_digest<T: SolStruct>(domain_separator: B256, message: &T) -> B256 {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain_separator.as_slice());
    buf.extend_from_slice(message.eip712_hash_struct().as_slice());
    keccak256(buf)
}

pub fn recover(digest: B256, signature: &EcdsaSignature) -> Result<Address, CoreError> {
    ecrecover_address(digest, signature.v, signature.r, signature.s)
        .map_err(|_| CoreError::InvalidSignature)
}

/// Fails unless `signature` recovers to `expected`, which must not be the zero address.
pub fn verify(digest: B256, signature: &EcdsaSignature, expected: Address) -> Result<(), CoreError> {
    let recovered = recover(digest, signature)?;
    if recovered == Address::ZERO || recovered != expected {
        return Err(CoreError::InvalidSignature);
    }
    Ok(())
}

/// Sign a digest; `v` is returned as 27/28.
pub fn sign_digest(key: &SigningKey, digest: B256) -> Result<EcdsaSignature, k256::ecdsa::Error> {
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest.as_slice())?;
    let bytes = signature.to_bytes();
    Ok(EcdsaSignature {
        v: recovery_id.to_byte() + 27,
        r: B256::from_slice(&bytes[..32]),
        s: B256::from_slice(&bytes[32..]),
    })
}
