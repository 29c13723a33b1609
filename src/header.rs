// src/header.rs
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::OnceCell;

use byteorder::{BigEndian, ByteOrder};

use crate::codec::{fixed, FieldSpec, RawItem, Record, Schema};
use crate::error::{PlasmaError, SchemaViolation};
use crate::hash::hash_personal_message;
use crate::lengths::{
    BLOCK_HEADER_ITEMS, BLOCK_HEADER_LAYOUT, BLOCK_HEADER_LENGTH, BLOCK_NUMBER_LENGTH,
    MERKLE_ROOT_LENGTH, PREVIOUS_HASH_LENGTH, SIGNATURE_R_LENGTH, SIGNATURE_S_LENGTH,
    SIGNATURE_V_LENGTH, TX_NUMBER_LENGTH, TX_TO_ADDRESS_LENGTH,
};
use crate::signature::{public_key_to_address, recover_public_key, sign_hash, Signature};

/// Trailing v, r, s items excluded from the unsigned hash.
const SIGNATURE_ITEMS: usize = 3;

const FIELDS: [FieldSpec; BLOCK_HEADER_ITEMS] = [
    FieldSpec::fixed("blockNumber", Some("block"), BLOCK_NUMBER_LENGTH, false),
    FieldSpec::fixed("numberOfTransactions", Some("numTX"), TX_NUMBER_LENGTH, false),
    FieldSpec::fixed("parentHash", None, PREVIOUS_HASH_LENGTH, true),
    FieldSpec::fixed("merkleRootHash", Some("merkle"), MERKLE_ROOT_LENGTH, true),
    FieldSpec::fixed("v", None, SIGNATURE_V_LENGTH, true),
    FieldSpec::fixed("r", None, SIGNATURE_R_LENGTH, true),
    FieldSpec::fixed("s", None, SIGNATURE_S_LENGTH, true),
];

/// The signed block header.
/// On the wire it is the plain concatenation of its fixed-width fields (no length prefixes).
#[derive(Debug, Clone, Default)]
pub struct BlockHeader {
    block_number: [u8; BLOCK_NUMBER_LENGTH],
    number_of_transactions: [u8; TX_NUMBER_LENGTH],
    parent_hash: [u8; PREVIOUS_HASH_LENGTH],
    merkle_root_hash: [u8; MERKLE_ROOT_LENGTH],
    signature: Signature,
    sender_public_key: OnceCell<Option<[u8; 64]>>,
}

impl BlockHeader {
    pub fn new(
        block_number: u32,
        number_of_transactions: u32,
        parent_hash: [u8; PREVIOUS_HASH_LENGTH],
        merkle_root_hash: [u8; MERKLE_ROOT_LENGTH],
    ) -> Self {
        let mut header = Self {
            parent_hash,
            merkle_root_hash,
            ..Self::default()
        };
        BigEndian::write_u32(&mut header.block_number, block_number);
        BigEndian::write_u32(&mut header.number_of_transactions, number_of_transactions);
        header
    }

    /// Parses the fixed-width header from the first `BLOCK_HEADER_LENGTH` bytes of a slice.
    /// Bytes after the header are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PlasmaError> {
        if bytes.len() < BLOCK_HEADER_LENGTH {
            return Err(PlasmaError::IncompleteData);
        }

        // 1. Slice fields at their fixed offsets
        let mut items = Vec::with_capacity(BLOCK_HEADER_ITEMS);
        let mut offset = 0;
        for width in BLOCK_HEADER_LAYOUT {
            items.push(RawItem::from(&bytes[offset..offset + width]));
            offset += width;
        }

        // 2. Assign through the schema so widths and zero rules are enforced
        Self::from_raw(items)
    }

    /// Serializes the header to its fixed-width wire form.
    pub fn to_bytes(&self) -> [u8; BLOCK_HEADER_LENGTH] {
        let mut buf = [0u8; BLOCK_HEADER_LENGTH];
        let mut offset = 0;
        for item in self.clear_raw(true) {
            buf[offset..offset + item.len()].copy_from_slice(&item);
            offset += item.len();
        }
        buf
    }

    /// Field values in order, optionally without the trailing signature.
    pub fn clear_raw(&self, include_signature: bool) -> Vec<Vec<u8>> {
        let mut items = vec![
            self.block_number.to_vec(),
            self.number_of_transactions.to_vec(),
            self.parent_hash.to_vec(),
            self.merkle_root_hash.to_vec(),
            vec![self.signature.v],
            self.signature.r.to_vec(),
            self.signature.s.to_vec(),
        ];
        if !include_signature {
            items.truncate(BLOCK_HEADER_ITEMS - SIGNATURE_ITEMS);
        }
        items
    }

    /// Personal-message hash over the concatenated fields. Signing uses `hash(false)`.
    pub fn hash(&self, include_signature: bool) -> [u8; 32] {
        hash_personal_message(&self.clear_raw(include_signature).concat())
    }

    pub fn block_number(&self) -> u32 {
        BigEndian::read_u32(&self.block_number)
    }

    pub fn number_of_transactions(&self) -> u32 {
        BigEndian::read_u32(&self.number_of_transactions)
    }

    pub fn parent_hash(&self) -> &[u8; PREVIOUS_HASH_LENGTH] {
        &self.parent_hash
    }

    pub fn merkle_root_hash(&self) -> &[u8; MERKLE_ROOT_LENGTH] {
        &self.merkle_root_hash
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
        self.sender_public_key = OnceCell::new();
    }

    pub fn sign(&mut self, private_key: &[u8; 32]) -> Result<(), PlasmaError> {
        let signature = sign_hash(&self.hash(false), private_key)?;
        self.set_signature(signature);
        Ok(())
    }

    pub fn apply_rpc_signature(&mut self, signature_hex: &str) -> Result<(), PlasmaError> {
        self.set_signature(Signature::from_rpc_hex(signature_hex)?);
        Ok(())
    }

    pub fn sender_public_key(&self) -> Option<[u8; 64]> {
        *self
            .sender_public_key
            .get_or_init(|| recover_public_key(&self.hash(false), &self.signature))
    }

    pub fn sender_address(&self) -> Option<[u8; TX_TO_ADDRESS_LENGTH]> {
        self.sender_public_key().map(|pk| public_key_to_address(&pk))
    }

    pub fn verify_signature(&self) -> bool {
        self.sender_public_key().is_some()
    }

    pub fn validation_errors(&self) -> Vec<PlasmaError> {
        if self.verify_signature() {
            Vec::new()
        } else {
            vec![PlasmaError::InvalidSignature]
        }
    }

    pub fn validate(&self) -> bool {
        self.verify_signature()
    }

    /// Failure reasons joined by a space. Empty when valid.
    pub fn validation_report(&self) -> String {
        self.validation_errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PartialEq for BlockHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlockHeader {}

impl Record for BlockHeader {
    const SCHEMA: Schema = Schema::new("BlockHeader", &FIELDS);

    fn raw(&self) -> Vec<RawItem> {
        self.clear_raw(true).into_iter().map(RawItem::Bytes).collect()
    }

    fn assign(&mut self, index: usize, value: Option<Vec<u8>>) -> Result<(), PlasmaError> {
        match index {
            0 => self.block_number = fixed(value),
            1 => self.number_of_transactions = fixed(value),
            2 => self.parent_hash = fixed(value),
            3 => self.merkle_root_hash = fixed(value),
            4 => self.signature.v = fixed::<SIGNATURE_V_LENGTH>(value)[0],
            5 => self.signature.r = fixed(value),
            6 => self.signature.s = fixed(value),
            _ => return Err(SchemaViolation::UnknownField.into()),
        }
        self.sender_public_key = OnceCell::new();
        Ok(())
    }
}
