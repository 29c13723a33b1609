use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::OnceCell;

use crate::codec::{fixed, nested, FieldSpec, RawItem, Record, Schema};
use crate::error::{PlasmaError, SchemaViolation};
use crate::lengths::{
    SIGNATURE_R_LENGTH, SIGNATURE_S_LENGTH, SIGNATURE_V_LENGTH, TX_TO_ADDRESS_LENGTH,
};
use crate::signature::{public_key_to_address, recover_public_key, sign_hash, Signature};
use crate::tx::PlasmaTransaction;

const FIELDS: [FieldSpec; 4] = [
    FieldSpec::nested("transaction"),
    FieldSpec::fixed("v", None, SIGNATURE_V_LENGTH, true),
    FieldSpec::fixed("r", None, SIGNATURE_R_LENGTH, true),
    FieldSpec::fixed("s", None, SIGNATURE_S_LENGTH, true),
];

/// A transaction plus the sender's (v, r, s) signature over its identity hash.
///
/// The recovered public key and address are memoized and reset whenever the signature or
/// the inner transaction is replaced.
#[derive(Debug, Clone, Default)]
pub struct SignedTransaction {
    transaction: PlasmaTransaction,
    signature: Signature,
    sender_public_key: OnceCell<Option<[u8; 64]>>,
    sender_address: OnceCell<Option<[u8; TX_TO_ADDRESS_LENGTH]>>,
}

impl SignedTransaction {
    /// Wraps a transaction with an all-zero (unset) signature.
    pub fn new(transaction: PlasmaTransaction) -> Self {
        Self {
            transaction,
            ..Self::default()
        }
    }

    pub fn with_signature(transaction: PlasmaTransaction, signature: Signature) -> Self {
        Self {
            transaction,
            signature,
            ..Self::default()
        }
    }

    /// The empty transaction with a zero signature.
    pub fn empty() -> Self {
        Self::new(PlasmaTransaction::empty())
    }

    /// Encoding of [`SignedTransaction::empty`]; block trees pad odd levels with its hash.
    pub fn empty_encoding() -> Vec<u8> {
        Self::empty().encode()
    }

    pub fn transaction(&self) -> &PlasmaTransaction {
        &self.transaction
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Replaces (v, r, s) and drops the cached sender.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
        self.clear_sender();
    }

    fn clear_sender(&mut self) {
        self.sender_public_key = OnceCell::new();
        self.sender_address = OnceCell::new();
    }

    /// Message the sender signs: the inner transaction's identity hash.
    pub fn signing_hash(&self) -> [u8; 32] {
        self.transaction.hash()
    }

    /// Identity hash of the full signed encoding. Block merkle leaves are built from it.
    pub fn hash(&self) -> [u8; 32] {
        self.content_hash()
    }

    /// Signs the inner transaction and re-verifies, priming the sender cache.
    pub fn sign(&mut self, private_key: &[u8; 32]) -> Result<(), PlasmaError> {
        let signature = sign_hash(&self.signing_hash(), private_key)?;
        self.set_signature(signature);
        if self.verify_signature() {
            Ok(())
        } else {
            Err(PlasmaError::InvalidSignature)
        }
    }

    /// Attaches a `0x` r ‖ s ‖ v signature produced by an external signer.
    pub fn apply_rpc_signature(&mut self, signature_hex: &str) -> Result<(), PlasmaError> {
        let signature = Signature::from_rpc_hex(signature_hex)?;
        self.set_signature(signature);
        Ok(())
    }

    /// Recovers the signer. `None` for a high `s`, bad `v`, or unrecoverable signature.
    pub fn sender_public_key(&self) -> Option<[u8; 64]> {
        *self
            .sender_public_key
            .get_or_init(|| recover_public_key(&self.signing_hash(), &self.signature))
    }

    pub fn sender_address(&self) -> Option<[u8; TX_TO_ADDRESS_LENGTH]> {
        *self.sender_address.get_or_init(|| {
            self.sender_public_key()
                .map(|pk| public_key_to_address(&pk))
        })
    }

    pub fn verify_signature(&self) -> bool {
        self.sender_public_key().is_some()
    }

    /// Inner transaction well-formed and a sender recoverable from the signature.
    pub fn is_well_formed(&self) -> bool {
        self.transaction.is_well_formed() && self.sender_address().is_some()
    }

    /// Every reason this transaction fails validation, in check order.
    pub fn validation_errors(&self) -> Vec<PlasmaError> {
        let mut errors = Vec::new();
        if !self.transaction.is_well_formed() {
            errors.push(PlasmaError::MalformedTransaction);
        }
        if !self.verify_signature() {
            errors.push(PlasmaError::InvalidSignature);
        }
        errors
    }

    pub fn validate(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Failure reasons joined by ", ". Empty when valid.
    pub fn validation_report(&self) -> String {
        self.validation_errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for SignedTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.transaction == other.transaction && self.signature == other.signature
    }
}

impl Eq for SignedTransaction {}

impl Record for SignedTransaction {
    const SCHEMA: Schema = Schema::new("SignedTransaction", &FIELDS);

    fn raw(&self) -> Vec<RawItem> {
        vec![
            RawItem::List(self.transaction.raw()),
            vec![self.signature.v].into(),
            self.signature.r.to_vec().into(),
            self.signature.s.to_vec().into(),
        ]
    }

    fn assign(&mut self, index: usize, value: Option<Vec<u8>>) -> Result<(), PlasmaError> {
        match index {
            0 => return Err(SchemaViolation::ExpectedList("transaction").into()),
            1 => self.signature.v = fixed::<SIGNATURE_V_LENGTH>(value)[0],
            2 => self.signature.r = fixed(value),
            3 => self.signature.s = fixed(value),
            _ => return Err(SchemaViolation::UnknownField.into()),
        }
        self.clear_sender();
        Ok(())
    }

    fn assign_nested(&mut self, index: usize, item: RawItem) -> Result<(), PlasmaError> {
        match index {
            0 => self.transaction = nested(item)?,
            _ => return Err(SchemaViolation::ExpectedBytes("v").into()),
        }
        self.clear_sender();
        Ok(())
    }
}
