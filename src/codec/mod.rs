//! Schema-driven record codec.
//!
//! A record is an ordered list of fields described by a static [`Schema`]. Its wire form is
//! the recursive length-prefix (RLP) encoding of the raw field values in schema order;
//! nested sub-records contribute their own field list rather than a flat byte string.

pub mod schema;

use alloc::vec::Vec;

use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::error::{PlasmaError, SchemaViolation};
use crate::hash::{hash_personal_message, HashType};

pub use schema::{fixed, FieldKind, FieldSpec, Schema};

/// A raw field value: a byte string or a list of raw values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawItem {
    Bytes(Vec<u8>),
    List(Vec<RawItem>),
}

impl RawItem {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawItem::Bytes(b) => Some(b),
            RawItem::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RawItem]> {
        match self {
            RawItem::Bytes(_) => None,
            RawItem::List(items) => Some(items),
        }
    }
}

impl From<Vec<u8>> for RawItem {
    fn from(bytes: Vec<u8>) -> Self {
        RawItem::Bytes(bytes)
    }
}

impl From<&[u8]> for RawItem {
    fn from(bytes: &[u8]) -> Self {
        RawItem::Bytes(bytes.to_vec())
    }
}

impl Encodable for RawItem {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            RawItem::Bytes(b) => b.rlp_append(s),
            RawItem::List(items) => {
                s.begin_list(items.len());
                for item in items {
                    s.append(item);
                }
            }
        }
    }
}

impl Decodable for RawItem {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if !rlp.is_list() {
            return Vec::<u8>::decode(rlp).map(RawItem::Bytes);
        }
        // The item count stops at the first malformed item, so the items
        // must also account for the whole list payload.
        let count = rlp.item_count()?;
        let mut items = Vec::with_capacity(count);
        let mut consumed = 0;
        for index in 0..count {
            let item = rlp.at(index)?;
            consumed += item.as_raw().len();
            items.push(RawItem::decode(&item)?);
        }
        if consumed != rlp.payload_info()?.value_len {
            return Err(DecoderError::RlpInconsistentLengthAndData);
        }
        Ok(RawItem::List(items))
    }
}

/// Encodes one raw item (byte string or list) canonically.
pub fn encode_item(item: &RawItem) -> Vec<u8> {
    rlp::encode(item).to_vec()
}

/// Encodes a list of byte strings, e.g. the transaction list of a block.
pub fn encode_byte_list(items: &[Vec<u8>]) -> Vec<u8> {
    let mut stream = RlpStream::new_list(items.len());
    for item in items {
        stream.append(item);
    }
    stream.out().to_vec()
}

/// Decodes exactly one top-level item. Bytes beyond it are rejected, and input that
/// ends before the declared length is [`PlasmaError::IncompleteData`].
pub fn decode_item(bytes: &[u8]) -> Result<RawItem, PlasmaError> {
    let rlp = Rlp::new(bytes);
    let total = rlp.payload_info()?.total();
    if total < bytes.len() {
        return Err(PlasmaError::TrailingData(bytes.len() - total));
    }
    Ok(RawItem::decode(&rlp)?)
}

/// A fixed-shape record whose fields are described by `SCHEMA`.
///
/// Implementors store each byte field in its canonical representation and expose typed
/// accessors; the provided methods handle normalization, arity checks and encoding.
pub trait Record: Default + Sized {
    const SCHEMA: Schema;

    /// Raw field values in schema order.
    fn raw(&self) -> Vec<RawItem>;

    /// Stores an already-normalized byte value at schema position `index`.
    /// `None` restores the field default.
    fn assign(&mut self, index: usize, value: Option<Vec<u8>>) -> Result<(), PlasmaError>;

    /// Stores a sub-record (or sub-record list) at schema position `index`.
    fn assign_nested(&mut self, index: usize, item: RawItem) -> Result<(), PlasmaError> {
        let _ = item;
        let name = Self::SCHEMA
            .fields()
            .get(index)
            .map_or(Self::SCHEMA.record, |f| f.name);
        Err(SchemaViolation::ExpectedBytes(name).into())
    }

    /// Sets a byte field by name or alias, validating it against the schema.
    fn set(&mut self, name: &str, value: &[u8]) -> Result<(), PlasmaError> {
        let index = Self::SCHEMA
            .index_of(name)
            .ok_or(PlasmaError::SchemaViolation(SchemaViolation::UnknownField))?;
        let normalized = Self::SCHEMA.fields()[index].normalize(value)?;
        self.assign(index, normalized)
    }

    /// Reads a byte field by name or alias. `None` for unknown or nested fields.
    fn get(&self, name: &str) -> Option<Vec<u8>> {
        let index = Self::SCHEMA.index_of(name)?;
        match self.raw().into_iter().nth(index)? {
            RawItem::Bytes(b) => Some(b),
            RawItem::List(_) => None,
        }
    }

    /// Builds a record from raw values assigned by schema position.
    /// Missing trailing fields keep their defaults.
    fn from_raw(items: Vec<RawItem>) -> Result<Self, PlasmaError> {
        let schema = Self::SCHEMA;
        if items.len() > schema.len() {
            return Err(SchemaViolation::TooManyItems {
                record: schema.record,
                max: schema.len(),
                found: items.len(),
            }
            .into());
        }

        let mut record = Self::default();
        for (index, item) in items.into_iter().enumerate() {
            let field = &schema.fields()[index];
            match (field.kind, item) {
                (FieldKind::Bytes { .. }, RawItem::Bytes(bytes)) => {
                    let value = field.normalize(&bytes)?;
                    record.assign(index, value)?;
                }
                (FieldKind::Bytes { .. }, RawItem::List(_)) => {
                    return Err(SchemaViolation::ExpectedBytes(field.name).into());
                }
                (_, item @ RawItem::List(_)) => record.assign_nested(index, item)?,
                (_, RawItem::Bytes(_)) => {
                    return Err(SchemaViolation::ExpectedList(field.name).into());
                }
            }
        }
        Ok(record)
    }

    /// Parses the canonical encoding into its top-level items, then assigns them by position.
    fn decode(bytes: &[u8]) -> Result<Self, PlasmaError> {
        match decode_item(bytes)? {
            RawItem::List(items) => Self::from_raw(items),
            RawItem::Bytes(_) => Err(SchemaViolation::ExpectedList(Self::SCHEMA.record).into()),
        }
    }

    /// Canonical encoding: the length-prefixed list of raw fields.
    fn encode(&self) -> Vec<u8> {
        encode_item(&RawItem::List(self.raw()))
    }

    /// Personal-message hash of the canonical encoding (signing and identity hash).
    fn content_hash(&self) -> [u8; 32] {
        hash_personal_message(&self.encode())
    }

    /// Plain digest of the canonical encoding with a chosen hash function.
    fn digest(&self, hash_type: HashType) -> Vec<u8> {
        hash_type.digest(&self.encode())
    }
}

/// Decodes a single nested sub-record.
pub fn nested<R: Record>(item: RawItem) -> Result<R, PlasmaError> {
    match item {
        RawItem::List(items) => R::from_raw(items),
        RawItem::Bytes(_) => Err(SchemaViolation::ExpectedList(R::SCHEMA.record).into()),
    }
}

/// Decodes an ordered list of nested sub-records.
pub fn nested_array<R: Record>(item: RawItem) -> Result<Vec<R>, PlasmaError> {
    match item {
        RawItem::List(items) => items.into_iter().map(nested::<R>).collect(),
        RawItem::Bytes(_) => Err(SchemaViolation::ExpectedList(R::SCHEMA.record).into()),
    }
}

/// Raw form of a sub-record list.
pub fn nested_array_raw<R: Record>(records: &[R]) -> RawItem {
    RawItem::List(records.iter().map(|r| RawItem::List(r.raw())).collect())
}
