//! Binary merkle tree over an ordered leaf list.
//!
//! Levels are stored leaf-first: `levels[0]` holds the (possibly padded) leaves and the last
//! level holds the single root. Padding added by the Bitcoin and Plasma disciplines lives in
//! `levels` only; `leaves` always reflects exactly what the caller inserted.

pub mod proof;

use alloc::vec::Vec;

use crate::error::PlasmaError;
use crate::hash::HashType;

pub use proof::ProofElement;

/// How an odd trailing node is handled while building a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeDiscipline {
    /// The odd node is promoted unchanged.
    Standard { double_hash: bool },
    /// The odd node is paired with a copy of itself.
    Bitcoin { double_hash: bool },
    /// The odd node is paired with `Hash(padding)`.
    Plasma { padding: Vec<u8> },
}

/// A leaf as supplied by the caller: raw bytes or a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafValue<'a> {
    Bytes(&'a [u8]),
    Hex(&'a str),
}

impl<'a> LeafValue<'a> {
    fn to_bytes(self) -> Result<Vec<u8>, PlasmaError> {
        match self {
            LeafValue::Bytes(b) => Ok(b.to_vec()),
            LeafValue::Hex(s) => decode_hex(s),
        }
    }
}

impl<'a> From<&'a [u8]> for LeafValue<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        LeafValue::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for LeafValue<'a> {
    fn from(s: &'a str) -> Self {
        LeafValue::Hex(s)
    }
}

/// Strict hex: at least one byte, even length, no prefix.
pub(crate) fn decode_hex(s: &str) -> Result<Vec<u8>, PlasmaError> {
    if s.len() < 2 {
        return Err(PlasmaError::BadLeafValue);
    }
    hex::decode(s).map_err(|_| PlasmaError::BadLeafValue)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    hash_type: HashType,
    leaves: Vec<Vec<u8>>,
    levels: Vec<Vec<Vec<u8>>>,
    double_hash: bool,
    ready: bool,
}

impl Default for MerkleTree {
    fn default() -> Self {
        Self::new(HashType::default())
    }
}

impl MerkleTree {
    pub fn new(hash_type: HashType) -> Self {
        Self {
            hash_type,
            leaves: Vec::new(),
            levels: Vec::new(),
            double_hash: false,
            ready: false,
        }
    }

    pub fn hash_type(&self) -> HashType {
        self.hash_type
    }

    /// Drops all leaves and levels.
    pub fn reset(&mut self) {
        self.leaves.clear();
        self.levels.clear();
        self.double_hash = false;
        self.ready = false;
    }

    /// Appends a leaf, hashing it first when `do_hash` is set.
    /// Hex input is decoded before hashing.
    pub fn add_leaf(&mut self, value: LeafValue<'_>, do_hash: bool) -> Result<(), PlasmaError> {
        self.ready = false;
        let bytes = value.to_bytes()?;
        let leaf = if do_hash {
            self.hash_type.digest(&bytes)
        } else {
            bytes
        };
        self.leaves.push(leaf);
        Ok(())
    }

    /// Appends leaves in order. Stops at the first bad value; leaves before it stay added.
    pub fn add_leaves<'a, I>(&mut self, values: I, do_hash: bool) -> Result<(), PlasmaError>
    where
        I: IntoIterator<Item = LeafValue<'a>>,
    {
        self.ready = false;
        for value in values {
            self.add_leaf(value, do_hash)?;
        }
        Ok(())
    }

    pub fn leaf(&self, index: usize) -> Option<&[u8]> {
        self.leaves.get(index).map(Vec::as_slice)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn make_tree(&mut self, double_hash: bool) {
        self.build(&TreeDiscipline::Standard { double_hash });
    }

    pub fn make_btc_tree(&mut self, double_hash: bool) {
        self.build(&TreeDiscipline::Bitcoin { double_hash });
    }

    pub fn make_plasma_tree(&mut self, padding: &[u8]) {
        self.build(&TreeDiscipline::Plasma {
            padding: padding.to_vec(),
        });
    }

    /// Builds every level from the current leaves. An empty tree becomes ready with no root.
    pub fn build(&mut self, discipline: &TreeDiscipline) {
        self.ready = false;
        self.levels.clear();
        self.double_hash = match discipline {
            TreeDiscipline::Standard { double_hash } | TreeDiscipline::Bitcoin { double_hash } => {
                *double_hash
            }
            TreeDiscipline::Plasma { .. } => false,
        };

        if !self.leaves.is_empty() {
            let filler = match discipline {
                TreeDiscipline::Plasma { padding } => Some(self.hash_type.digest(padding)),
                _ => None,
            };

            let mut current = self.leaves.clone();
            while current.len() > 1 {
                if current.len() % 2 == 1 {
                    match (discipline, &filler) {
                        (TreeDiscipline::Bitcoin { .. }, _) => {
                            let last = current[current.len() - 1].clone();
                            current.push(last);
                        }
                        (TreeDiscipline::Plasma { .. }, Some(fill)) => current.push(fill.clone()),
                        _ => {}
                    }
                }
                let next = self.next_level(&current);
                self.levels.push(current);
                current = next;
            }
            self.levels.push(current);
        }
        self.ready = true;
    }

    /// Pairs nodes left to right. An unpaired trailing node is promoted as is.
    fn next_level(&self, level: &[Vec<u8>]) -> Vec<Vec<u8>> {
        level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => self.combine(left, right),
                _ => pair[0].clone(),
            })
            .collect()
    }

    fn combine(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        let mut joined = Vec::with_capacity(left.len() + right.len());
        joined.extend_from_slice(left);
        joined.extend_from_slice(right);
        let digest = self.hash_type.digest(&joined);
        if self.double_hash {
            self.hash_type.digest(&digest)
        } else {
            digest
        }
    }

    /// `None` until the tree is built, and for an empty tree.
    pub fn merkle_root(&self) -> Option<&[u8]> {
        if !self.ready {
            return None;
        }
        self.levels
            .last()
            .and_then(|top| top.first())
            .map(Vec::as_slice)
    }

    /// Sibling path from leaf `index` to the root, in root-ward order.
    pub fn proof(&self, index: usize) -> Option<Vec<ProofElement>> {
        if !self.ready || index >= self.leaves.len() {
            return None;
        }

        let mut index = index;
        let mut path = Vec::new();
        for level in self.levels.iter().take(self.levels.len().saturating_sub(1)) {
            let count = level.len();
            if index == count - 1 && count % 2 == 1 {
                // promoted without a partner
                index /= 2;
                continue;
            }
            let element = if index % 2 == 1 {
                ProofElement::Left(level[index - 1].clone())
            } else {
                ProofElement::Right(level[index + 1].clone())
            };
            path.push(element);
            index /= 2;
        }
        Some(path)
    }

    /// Compact form of [`MerkleTree::proof`]: direction byte then sibling, per level.
    pub fn binary_proof(&self, index: usize) -> Option<Vec<u8>> {
        self.proof(index).map(|path| proof::to_binary(&path))
    }

    /// Folds `proof` over `target` and compares with `root`.
    pub fn validate_proof(&self, proof: &[ProofElement], target: &[u8], root: &[u8]) -> bool {
        if proof.is_empty() {
            return target == root;
        }
        let mut running = target.to_vec();
        for element in proof {
            running = match element {
                ProofElement::Left(sibling) => self.combine(sibling, &running),
                ProofElement::Right(sibling) => self.combine(&running, sibling),
            };
        }
        running == root
    }

    /// Binary variant of [`MerkleTree::validate_proof`]. Chunks are one direction byte
    /// followed by a sibling of the tree's digest width.
    pub fn validate_binary_proof(&self, proof: &[u8], target: &[u8], root: &[u8]) -> bool {
        match proof::from_binary(proof, self.hash_type.output_len()) {
            Some(path) => self.validate_proof(&path, target, root),
            None => false,
        }
    }
}
