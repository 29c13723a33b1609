//! Content hashing: the digest family used by merkle trees and the personal-message
//! hash used for signing and transaction identity.

use alloc::format;
use alloc::vec::Vec;
use core::str::FromStr;

use bitcoin_hashes::{sha256, Hash};
use sha3::{Digest, Keccak256, Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// Prefix of an Ethereum personal message: "\x19Ethereum Signed Message:\n" then decimal length.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Hash function discriminator for merkle trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashType {
    #[default]
    Sha256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    /// Legacy Keccak-256 (pre-standard SHA-3 padding), named "sha3" by Ethereum tooling.
    Keccak256,
}

impl HashType {
    /// Digest width in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            HashType::Sha3_224 => 28,
            HashType::Sha3_384 => 48,
            HashType::Sha3_512 => 64,
            HashType::Sha256 | HashType::Sha3_256 | HashType::Keccak256 => 32,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashType::Sha256 => sha256::Hash::hash(data).to_byte_array().to_vec(),
            HashType::Sha3_224 => Sha3_224::digest(data).to_vec(),
            HashType::Sha3_256 => Sha3_256::digest(data).to_vec(),
            HashType::Sha3_384 => Sha3_384::digest(data).to_vec(),
            HashType::Sha3_512 => Sha3_512::digest(data).to_vec(),
            HashType::Keccak256 => keccak256(data).to_vec(),
        }
    }
}

impl FromStr for HashType {
    type Err = ();

    /// Accepts the names used by merkle tooling: "sha256", "SHA3-224", "SHA3-256",
    /// "SHA3-384", "SHA3-512" and "sha3" (Keccak-256).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sha256" | "SHA256" => Ok(HashType::Sha256),
            "SHA3-224" => Ok(HashType::Sha3_224),
            "SHA3-256" => Ok(HashType::Sha3_256),
            "SHA3-384" => Ok(HashType::Sha3_384),
            "SHA3-512" => Ok(HashType::Sha3_512),
            "sha3" | "keccak256" => Ok(HashType::Keccak256),
            _ => Err(()),
        }
    }
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// keccak256("\x19Ethereum Signed Message:\n" ++ len ++ message).
pub fn hash_personal_message(message: &[u8]) -> [u8; 32] {
    let len = format!("{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(len.as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}
