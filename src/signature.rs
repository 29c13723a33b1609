//! secp256k1 ECDSA with Ethereum conventions: recoverable signatures carrying `v = 27 + recid`,
//! low-S enforcement on recovery, and keccak-derived 20-byte addresses.

use alloc::string::String;

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

use crate::error::PlasmaError;
use crate::hash::keccak256;
use crate::lengths::{SIGNATURE_R_LENGTH, SIGNATURE_S_LENGTH, TX_TO_ADDRESS_LENGTH};

/// Half the secp256k1 group order. Signatures with a larger `s` are malleable twins.
pub const SECP256K1_HALF_N: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Offset added to the recovery id to form `v`.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// An (v, r, s) triple. `v` is 27 or 28 for a signature produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    pub v: u8,
    pub r: [u8; SIGNATURE_R_LENGTH],
    pub s: [u8; SIGNATURE_S_LENGTH],
}

impl Signature {
    /// Parses the 65-byte `0x` r ‖ s ‖ v string returned by JSON-RPC signers.
    /// A `v` below 27 is shifted up by 27.
    pub fn from_rpc_hex(hex_str: &str) -> Result<Self, PlasmaError> {
        let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let mut raw = [0u8; 65];
        hex::decode_to_slice(stripped, &mut raw).map_err(|_| PlasmaError::InvalidSignature)?;

        let mut sig = Signature::default();
        sig.r.copy_from_slice(&raw[..32]);
        sig.s.copy_from_slice(&raw[32..64]);
        sig.v = raw[64];
        if sig.v < RECOVERY_ID_OFFSET {
            sig.v += RECOVERY_ID_OFFSET;
        }
        Ok(sig)
    }

    /// `true` if `s` does not exceed half the group order.
    pub fn is_low_s(&self) -> bool {
        self.s <= SECP256K1_HALF_N
    }
}

fn signing_key(private_key: &[u8; 32]) -> Result<SigningKey, PlasmaError> {
    SigningKey::from_slice(private_key).map_err(|_| PlasmaError::InvalidPrivateKey)
}

fn uncompressed(key: &VerifyingKey) -> [u8; 64] {
    let point = key.to_encoded_point(false);
    let mut out = [0u8; 64];
    // skip the 0x04 tag
    out.copy_from_slice(&point.as_bytes()[1..65]);
    out
}

/// Signs a 32-byte prehash. The result is always low-S.
pub fn sign_hash(hash: &[u8; 32], private_key: &[u8; 32]) -> Result<Signature, PlasmaError> {
    let key = signing_key(private_key)?;
    let (mut sig, mut recid) = key
        .sign_prehash_recoverable(hash)
        .map_err(|_| PlasmaError::InvalidSignature)?;
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
    }

    let bytes = sig.to_bytes();
    let mut out = Signature {
        v: RECOVERY_ID_OFFSET + recid.to_byte(),
        ..Signature::default()
    };
    out.r.copy_from_slice(&bytes[..32]);
    out.s.copy_from_slice(&bytes[32..]);
    Ok(out)
}

/// Recovers the 64-byte uncompressed public key (without tag) that produced `sig` over `hash`.
///
/// `None` for a high `s`, a `v` other than 27 or 28, out-of-range scalars, or no valid point.
pub fn recover_public_key(hash: &[u8; 32], sig: &Signature) -> Option<[u8; 64]> {
    if !sig.is_low_s() {
        return None;
    }
    let recid = match sig.v {
        27 | 28 => RecoveryId::from_byte(sig.v - RECOVERY_ID_OFFSET)?,
        _ => return None,
    };

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&sig.r);
    compact[32..].copy_from_slice(&sig.s);
    let signature = EcdsaSignature::from_slice(&compact).ok()?;

    let key = VerifyingKey::recover_from_prehash(hash, &signature, recid).ok()?;
    Some(uncompressed(&key))
}

/// Last 20 bytes of keccak256 over the untagged public key.
pub fn public_key_to_address(public_key: &[u8; 64]) -> [u8; TX_TO_ADDRESS_LENGTH] {
    let digest = keccak256(public_key);
    let mut address = [0u8; TX_TO_ADDRESS_LENGTH];
    address.copy_from_slice(&digest[12..]);
    address
}

pub fn private_key_to_public_key(private_key: &[u8; 32]) -> Result<[u8; 64], PlasmaError> {
    let key = signing_key(private_key)?;
    Ok(uncompressed(key.verifying_key()))
}

pub fn private_key_to_address(
    private_key: &[u8; 32],
) -> Result<[u8; TX_TO_ADDRESS_LENGTH], PlasmaError> {
    private_key_to_public_key(private_key).map(|pk| public_key_to_address(&pk))
}

/// EIP-55 mixed-case hex with `0x` prefix.
pub fn to_checksum_address(address: &[u8; TX_TO_ADDRESS_LENGTH]) -> String {
    let lower = hex::encode(address);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
