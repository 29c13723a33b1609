#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Needed for Vec
extern crate alloc;

pub mod block;
pub mod codec;
pub mod error;
pub mod export;
pub mod hash;
pub mod header;
pub mod lengths;
pub mod merkle;
pub mod pack;
pub mod signature;
pub mod tx;

pub use block::{Block, SpendProof, TransactionProof};
pub use codec::Record;
pub use error::{PlasmaError, SchemaViolation};
pub use hash::HashType;
pub use header::BlockHeader;
pub use merkle::{LeafValue, MerkleTree, ProofElement, TreeDiscipline};
pub use signature::Signature;
pub use tx::{
    PlasmaTransaction, SignedTransaction, TransactionInput, TransactionOutput, TxType, UtxoId,
};

#[cfg(feature = "export-json")]
pub use export::ToJson;
