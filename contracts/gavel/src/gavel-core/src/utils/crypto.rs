//! secp256k1 helpers behind signature verification.

use alloy_primitives::{keccak256, Address, B256};
use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey,
};

/// Ethereum address of a secp256k1 public key: the low 20 bytes of the keccak of the
/// uncompressed point without its `0x04` prefix.
pub fn public_key_address(key: &VerifyingKey) -> Address {
    let point = PublicKey::from(key).to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Recover the signer of a 32-byte digest.
///
/// Accepts v in {0,1,27,28}. High-s signatures are rejected.
pub fn ecrecover_address(digest: B256, v: u8, r: B256, s: B256) -> Result<Address, ()> {
    let recovery = match v {
        27 | 28 => v - 27,
        0 | 1 => v,
        _ => return Err(()),
    };
    let recovery_id = RecoveryId::from_byte(recovery).ok_or(())?;

    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(r.as_slice());
    rs[32..].copy_from_slice(s.as_slice());
    let signature = Signature::from_slice(&rs).map_err(|_| ())?;
    if signature.normalize_s().is_some() {
        return Err(());
    }

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|_| ())?;
    Ok(public_key_address(&key))
}
