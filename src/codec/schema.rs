//! Field schemas: the ordered descriptor table that fully defines a record type.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{PlasmaError, SchemaViolation};

/// How a field's raw value is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Raw bytes of `length` width. `allow_less` strips leading zeros (variable width up to
    /// `length`); `allow_zero` permits the single zero byte and the empty value.
    Bytes {
        length: usize,
        allow_less: bool,
        allow_zero: bool,
    },
    /// A single sub-record, stored as its own field list.
    Nested,
    /// An ordered list of sub-records.
    NestedArray,
}

/// One entry of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Fixed-width byte field. Defaults to `length` zero bytes.
    pub const fn fixed(
        name: &'static str,
        alias: Option<&'static str>,
        length: usize,
        allow_zero: bool,
    ) -> Self {
        Self {
            name,
            alias,
            kind: FieldKind::Bytes {
                length,
                allow_less: false,
                allow_zero,
            },
        }
    }

    /// Variable-width byte field with leading zeros stripped. Defaults to empty.
    pub const fn trimmed(name: &'static str, alias: Option<&'static str>, max: usize) -> Self {
        Self {
            name,
            alias,
            kind: FieldKind::Bytes {
                length: max,
                allow_less: true,
                allow_zero: true,
            },
        }
    }

    pub const fn nested(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: FieldKind::Nested,
        }
    }

    pub const fn nested_array(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: FieldKind::NestedArray,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.alias == Some(name)
    }

    pub const fn is_nested(&self) -> bool {
        !matches!(self.kind, FieldKind::Bytes { .. })
    }

    /// The value a freshly constructed record holds in this field.
    pub fn default_value(&self) -> Vec<u8> {
        match self.kind {
            FieldKind::Bytes {
                allow_less: false,
                length,
                ..
            } => vec![0u8; length],
            _ => Vec::new(),
        }
    }

    /// Canonicalizes a byte value for storage.
    ///
    /// Returns `Ok(None)` when the value is the "absent" sentinel of an allow-zero field,
    /// in which case the record keeps its default.
    pub fn normalize(&self, value: &[u8]) -> Result<Option<Vec<u8>>, PlasmaError> {
        let FieldKind::Bytes {
            length,
            allow_less,
            allow_zero,
        } = self.kind
        else {
            return Err(SchemaViolation::ExpectedList(self.name).into());
        };

        // A lone zero byte means "unset" unless zero is an explicit value.
        let value = if value == &[0u8][..] && !allow_zero {
            &[0u8; 0][..]
        } else {
            value
        };

        if allow_less {
            let first = value.iter().position(|b| *b != 0).unwrap_or(value.len());
            let stripped = &value[first..];
            if stripped.len() > length {
                return Err(SchemaViolation::FieldTooLong {
                    field: self.name,
                    max: length,
                    found: stripped.len(),
                }
                .into());
            }
            return Ok(Some(stripped.to_vec()));
        }

        if allow_zero && value.is_empty() {
            return Ok(None);
        }
        if value.len() != length {
            return Err(SchemaViolation::FieldLength {
                field: self.name,
                expected: length,
                found: value.len(),
            }
            .into());
        }
        Ok(Some(value.to_vec()))
    }
}

/// An ordered field table. Order is the canonical encode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub record: &'static str,
    fields: &'static [FieldSpec],
}

impl Schema {
    pub const fn new(record: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { record, fields }
    }

    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Position of the field called `name`, resolving aliases.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.matches(name))
    }

    pub fn field(&self, name: &str) -> Result<&'static FieldSpec, PlasmaError> {
        self.index_of(name)
            .map(|i| &self.fields[i])
            .ok_or(PlasmaError::SchemaViolation(SchemaViolation::UnknownField))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }
}

/// Copies a normalized value into a fixed array, left-padding shorter (allow-less) values.
/// `None` yields the zero default.
pub fn fixed<const N: usize>(value: Option<Vec<u8>>) -> [u8; N] {
    let mut out = [0u8; N];
    if let Some(v) = value {
        let take = core::cmp::min(v.len(), N);
        out[N - take..].copy_from_slice(&v[v.len() - take..]);
    }
    out
}
