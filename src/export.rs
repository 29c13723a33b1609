//! JSON projections for debugging and interop. Never used for hashing or wire equality.
//!
//! Three shapes per record:
//! - raw: the field list as nested arrays of `0x` hex strings,
//! - labeled: field name to `0x` hex, sub-records labeled recursively,
//! - full: typed values (integers, decimal amounts, checksum addresses).

#![cfg(feature = "export-json")]

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::block::Block;
use crate::codec::{RawItem, Record};
use crate::header::BlockHeader;
use crate::merkle::{decode_hex, MerkleTree, ProofElement};
use crate::signature::to_checksum_address;
use crate::tx::{PlasmaTransaction, SignedTransaction, TransactionInput, TransactionOutput};

fn hex_value(bytes: &[u8]) -> Value {
    Value::String(format!("0x{}", hex::encode(bytes)))
}

fn raw_item_json(item: &RawItem) -> Value {
    match item {
        RawItem::Bytes(b) => hex_value(b),
        RawItem::List(items) => Value::Array(items.iter().map(raw_item_json).collect()),
    }
}

/// Byte fields of a record keyed by schema name. Nested fields are left to the caller.
fn labeled_bytes<R: Record>(record: &R) -> Map<String, Value> {
    let mut obj = Map::new();
    for (field, item) in R::SCHEMA.fields().iter().zip(record.raw()) {
        if let RawItem::Bytes(b) = item {
            obj.insert(field.name.to_string(), hex_value(&b));
        }
    }
    obj
}

pub trait ToJson {
    fn to_raw_json(&self) -> Value;
    fn to_labeled_json(&self) -> Value;
    fn to_full_json(&self) -> Value;
}

/// Raw and labeled projections come straight from the schema for flat records.
macro_rules! flat_record_json {
    ($ty:ty, $full:expr) => {
        impl ToJson for $ty {
            fn to_raw_json(&self) -> Value {
                Value::Array(self.raw().iter().map(raw_item_json).collect())
            }

            fn to_labeled_json(&self) -> Value {
                Value::Object(labeled_bytes(self))
            }

            fn to_full_json(&self) -> Value {
                let full: fn(&$ty) -> Value = $full;
                full(self)
            }
        }
    };
}

flat_record_json!(TransactionInput, |input| {
    json!({
        "blockNumber": input.block_number(),
        "txNumberInBlock": input.tx_number_in_block(),
        "outputNumberInTransaction": input.output_number_in_transaction(),
        "value": input.value().to_string(),
    })
});

flat_record_json!(TransactionOutput, |output| {
    json!({
        "to": to_checksum_address(output.to()),
        "outputNumberInTransaction": output.output_number_in_transaction(),
        "value": output.value().to_string(),
    })
});

impl ToJson for PlasmaTransaction {
    fn to_raw_json(&self) -> Value {
        Value::Array(self.raw().iter().map(raw_item_json).collect())
    }

    fn to_labeled_json(&self) -> Value {
        let mut obj = labeled_bytes(self);
        obj.insert(
            "inputs".to_string(),
            Value::Array(self.inputs().iter().map(ToJson::to_labeled_json).collect()),
        );
        obj.insert(
            "outputs".to_string(),
            Value::Array(self.outputs().iter().map(ToJson::to_labeled_json).collect()),
        );
        Value::Object(obj)
    }

    fn to_full_json(&self) -> Value {
        json!({
            "transactionType": self.transaction_type_byte(),
            "inputs": self.inputs().iter().map(ToJson::to_full_json).collect::<Vec<_>>(),
            "outputs": self.outputs().iter().map(ToJson::to_full_json).collect::<Vec<_>>(),
        })
    }
}

impl ToJson for SignedTransaction {
    fn to_raw_json(&self) -> Value {
        Value::Array(self.raw().iter().map(raw_item_json).collect())
    }

    fn to_labeled_json(&self) -> Value {
        let mut obj = labeled_bytes(self);
        obj.insert("transaction".to_string(), self.transaction().to_labeled_json());
        Value::Object(obj)
    }

    fn to_full_json(&self) -> Value {
        let sig = self.signature();
        json!({
            "transaction": self.transaction().to_full_json(),
            "v": hex_value(&[sig.v]),
            "r": hex_value(&sig.r),
            "s": hex_value(&sig.s),
        })
    }
}

impl ToJson for BlockHeader {
    fn to_raw_json(&self) -> Value {
        Value::Array(self.raw().iter().map(raw_item_json).collect())
    }

    fn to_labeled_json(&self) -> Value {
        Value::Object(labeled_bytes(self))
    }

    fn to_full_json(&self) -> Value {
        let mut obj = labeled_bytes(self);
        obj.insert("blockNumber".to_string(), json!(self.block_number()));
        obj.insert(
            "numberOfTransactions".to_string(),
            json!(self.number_of_transactions()),
        );
        Value::Object(obj)
    }
}

impl ToJson for Block {
    /// The whole wire encoding as one hex string.
    fn to_raw_json(&self) -> Value {
        hex_value(&self.to_bytes())
    }

    fn to_labeled_json(&self) -> Value {
        json!({
            "header": self.header().to_labeled_json(),
            "transactions": self
                .transactions()
                .iter()
                .map(ToJson::to_labeled_json)
                .collect::<Vec<_>>(),
        })
    }

    fn to_full_json(&self) -> Value {
        json!({
            "header": self.header().to_full_json(),
            "transactions": self
                .transactions()
                .iter()
                .map(ToJson::to_full_json)
                .collect::<Vec<_>>(),
        })
    }
}

// -----------------------------------------------------------------------------
// Structured proofs
// -----------------------------------------------------------------------------

/// One step of a structured proof. Exactly one side is expected to be set.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProofStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right: Option<String>,
}

impl From<&ProofElement> for ProofStep {
    fn from(element: &ProofElement) -> Self {
        match element {
            ProofElement::Left(s) => Self {
                left: Some(hex::encode(s)),
                ..Self::default()
            },
            ProofElement::Right(s) => Self {
                right: Some(hex::encode(s)),
                ..Self::default()
            },
        }
    }
}

impl ProofStep {
    fn into_element(self) -> Option<ProofElement> {
        match (self.left, self.right) {
            (Some(left), _) => decode_hex(&left).ok().map(ProofElement::Left),
            (None, Some(right)) => decode_hex(&right).ok().map(ProofElement::Right),
            (None, None) => None,
        }
    }
}

/// `[{"left": hex}, {"right": hex}, ...]` in root-ward order.
pub fn proof_to_json(path: &[ProofElement]) -> Value {
    Value::Array(path.iter().map(|element| json!(ProofStep::from(element))).collect())
}

/// Reads a structured proof. `None` if any element lacks a left/right hex designation.
pub fn proof_from_json(proof: &Value) -> Option<Vec<ProofElement>> {
    Vec::<ProofStep>::deserialize(proof)
        .ok()?
        .into_iter()
        .map(ProofStep::into_element)
        .collect()
}

/// Validates a structured JSON proof against `tree`'s hash function. Never errors.
pub fn validate_json_proof(tree: &MerkleTree, proof: &Value, target: &[u8], root: &[u8]) -> bool {
    match proof_from_json(proof) {
        Some(path) => tree.validate_proof(&path, target, root),
        None => false,
    }
}
