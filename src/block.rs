//! Blocks: a signed header committing to an ordered transaction list through a merkle root.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::codec::Record;
use crate::error::PlasmaError;
use crate::hash::HashType;
use crate::header::BlockHeader;
use crate::lengths::{MERKLE_ROOT_LENGTH, PREVIOUS_HASH_LENGTH, TX_TO_ADDRESS_LENGTH};
use crate::merkle::{LeafValue, MerkleTree};
use crate::pack::{pack_block, unpack_block};
use crate::tx::{SignedTransaction, UtxoId};

const ZERO_ROOT: [u8; MERKLE_ROOT_LENGTH] = [0u8; MERKLE_ROOT_LENGTH];

/// Inclusion proof for one transaction: the compact binary merkle path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionProof<'a> {
    pub transaction: &'a SignedTransaction,
    pub proof: Vec<u8>,
}

/// Inclusion proof plus the position of the input spending the requested UTXO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendProof<'a> {
    pub transaction: &'a SignedTransaction,
    pub proof: Vec<u8>,
    pub input_number: usize,
}

#[derive(Debug, Clone)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<SignedTransaction>,
    merkle_tree: MerkleTree,
}

/// Keccak-256 Plasma tree over the signed transactions' identity hashes, padded with the
/// hash of the empty signed transaction.
fn build_tree(transactions: &[SignedTransaction]) -> Result<MerkleTree, PlasmaError> {
    let leaves: Vec<[u8; 32]> = transactions.iter().map(SignedTransaction::hash).collect();
    let mut tree = MerkleTree::new(HashType::Keccak256);
    tree.add_leaves(leaves.iter().map(|leaf| LeafValue::Bytes(&leaf[..])), false)?;
    tree.make_plasma_tree(&SignedTransaction::empty_encoding());
    Ok(tree)
}

fn root_of(tree: &MerkleTree) -> [u8; MERKLE_ROOT_LENGTH] {
    let mut root = ZERO_ROOT;
    if let Some(value) = tree.merkle_root() {
        root.copy_from_slice(value);
    }
    root
}

fn ensure_well_formed(transactions: &[SignedTransaction]) -> Result<(), PlasmaError> {
    if let Some(index) = transactions.iter().position(|tx| !tx.is_well_formed()) {
        warn!(index, "block contains malformed transaction");
        return Err(PlasmaError::MalformedTransaction);
    }
    Ok(())
}

impl Block {
    /// Builds a block over well-formed signed transactions. The header is left unsigned.
    /// An empty block carries the all-zero root.
    pub fn new(
        block_number: u32,
        parent_hash: [u8; PREVIOUS_HASH_LENGTH],
        transactions: Vec<SignedTransaction>,
    ) -> Result<Self, PlasmaError> {
        ensure_well_formed(&transactions)?;
        let count =
            u32::try_from(transactions.len()).map_err(|_| PlasmaError::InvalidTransactionCount)?;

        let merkle_tree = build_tree(&transactions)?;
        let root = root_of(&merkle_tree);
        let header = BlockHeader::new(block_number, count, parent_hash, root);
        debug!(block_number, count, root = %hex::encode(root), "built block");

        Ok(Self {
            header,
            transactions,
            merkle_tree,
        })
    }

    /// Parses and checks a block: every transaction well-formed, the count matching the
    /// header, and the rebuilt root matching the header root.
    ///
    /// An all-zero header root skips the root comparison. The header signature is not
    /// checked here; use [`Block::validate`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PlasmaError> {
        let (header, transactions) = unpack_block(bytes)?;
        ensure_well_formed(&transactions)?;

        let declared = header.number_of_transactions();
        if usize::try_from(declared).ok() != Some(transactions.len()) {
            warn!(declared, found = transactions.len(), "transaction count mismatch");
            return Err(PlasmaError::TransactionCountMismatch {
                declared,
                found: transactions.len(),
            });
        }

        let merkle_tree = build_tree(&transactions)?;
        if header.merkle_root_hash() == &ZERO_ROOT {
            warn!(
                block_number = header.block_number(),
                "zero merkle root in header, root check skipped"
            );
        } else if &root_of(&merkle_tree) != header.merkle_root_hash() {
            warn!(block_number = header.block_number(), "merkle root mismatch");
            return Err(PlasmaError::MerkleRootMismatch);
        }

        debug!(
            block_number = header.block_number(),
            count = transactions.len(),
            "parsed block"
        );
        Ok(Self {
            header,
            transactions,
            merkle_tree,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        pack_block(&self.header, &self.transactions)
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn transactions(&self) -> &[SignedTransaction] {
        &self.transactions
    }

    pub fn block_number(&self) -> u32 {
        self.header.block_number()
    }

    pub fn number_of_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// Root stored in the header.
    pub fn merkle_root(&self) -> &[u8; MERKLE_ROOT_LENGTH] {
        self.header.merkle_root_hash()
    }

    pub fn merkle_tree(&self) -> &MerkleTree {
        &self.merkle_tree
    }

    pub fn hash(&self, include_signature: bool) -> [u8; 32] {
        self.header.hash(include_signature)
    }

    pub fn sign(&mut self, private_key: &[u8; 32]) -> Result<(), PlasmaError> {
        self.header.sign(private_key)
    }

    pub fn apply_rpc_signature(&mut self, signature_hex: &str) -> Result<(), PlasmaError> {
        self.header.apply_rpc_signature(signature_hex)
    }

    pub fn verify_signature(&self) -> bool {
        self.header.verify_signature()
    }

    pub fn sender_public_key(&self) -> Option<[u8; 64]> {
        self.header.sender_public_key()
    }

    pub fn sender_address(&self) -> Option<[u8; TX_TO_ADDRESS_LENGTH]> {
        self.header.sender_address()
    }

    pub fn validation_errors(&self) -> Vec<PlasmaError> {
        let mut errors = Vec::new();
        if usize::try_from(self.header.number_of_transactions()).ok()
            != Some(self.transactions.len())
        {
            errors.push(PlasmaError::InvalidTransactionCount);
        }
        if !self.verify_signature() {
            errors.push(PlasmaError::InvalidSignature);
        }
        errors
    }

    /// Count consistency and a valid header signature.
    pub fn validate(&self) -> bool {
        self.validation_errors().is_empty()
    }

    /// Failure reasons joined by a space. Empty when valid.
    pub fn validation_report(&self) -> String {
        self.validation_errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn proof_for_transaction_by_index(&self, index: usize) -> Option<TransactionProof<'_>> {
        let transaction = self.transactions.get(index)?;
        let proof = self.merkle_tree.binary_proof(index)?;
        Some(TransactionProof { transaction, proof })
    }

    /// Finds the first transaction whose encoding equals `signed_tx`.
    pub fn proof_for_transaction(&self, signed_tx: &[u8]) -> Option<TransactionProof<'_>> {
        let index = self.position_of(signed_tx)?;
        self.proof_for_transaction_by_index(index)
    }

    /// Like [`Block::proof_for_transaction`], and also locates the input of that transaction
    /// spending `utxo`. Every input is checked, not only the first.
    pub fn proof_for_transaction_spending_utxo(
        &self,
        signed_tx: &[u8],
        utxo: UtxoId,
    ) -> Option<SpendProof<'_>> {
        let index = self.position_of(signed_tx)?;
        let transaction = &self.transactions[index];
        let input_number = transaction
            .transaction()
            .inputs()
            .iter()
            .position(|input| input.utxo_id() == utxo)?;
        let proof = self.merkle_tree.binary_proof(index)?;
        Some(SpendProof {
            transaction,
            proof,
            input_number,
        })
    }

    fn position_of(&self, signed_tx: &[u8]) -> Option<usize> {
        self.transactions
            .iter()
            .position(|tx| tx.encode().as_slice() == signed_tx)
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.transactions == other.transactions
    }
}

impl Eq for Block {}
