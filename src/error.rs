// src/error.rs

/// The precise reason a record failed its field schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// A fixed-width field received a value of the wrong length.
    FieldLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// An allow-less field received more significant bytes than its maximum width.
    FieldTooLong {
        field: &'static str,
        max: usize,
        found: usize,
    },

    /// More decoded items than the schema has fields.
    TooManyItems {
        record: &'static str,
        max: usize,
        found: usize,
    },

    /// The name is neither a field name nor an alias of the schema.
    UnknownField,

    /// A byte field received a list.
    ExpectedBytes(&'static str),

    /// A nested field received a byte string.
    ExpectedList(&'static str),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlasmaError {
    /// Field length/type/arity mismatch during encode or decode.
    SchemaViolation(SchemaViolation),

    /// A merkle leaf was neither raw bytes nor a well-formed hex string.
    BadLeafValue,

    /// The recursive length-prefix structure could not be parsed.
    EncodingError,

    /// The data ended before a fixed-width section could be read.
    IncompleteData,

    /// Bytes were left over after a complete top-level item.
    TrailingData(usize),

    /// Transaction type byte is not Null (0), Split (1), Merge (2) or Fund (4).
    InvalidTxType(u8),

    /// A transaction failed its well-formedness rules.
    MalformedTransaction,

    /// The signature is malleable, malformed, or does not recover a public key.
    InvalidSignature,

    /// The private key is zero or not below the curve order.
    InvalidPrivateKey,

    /// The header's transaction count disagrees with the decoded transaction list.
    TransactionCountMismatch { declared: u32, found: usize },

    /// The recomputed merkle root disagrees with the header's merkle root.
    MerkleRootMismatch,

    /// A block's transaction list does not match its header count.
    InvalidTransactionCount,

    /// UTXO identifier string could not be parsed (expected decimal or "block:tx:output").
    InvalidUtxoIdFormat,
}

impl From<SchemaViolation> for PlasmaError {
    fn from(violation: SchemaViolation) -> Self {
        Self::SchemaViolation(violation)
    }
}

impl From<rlp::DecoderError> for PlasmaError {
    fn from(err: rlp::DecoderError) -> Self {
        match err {
            rlp::DecoderError::RlpIsTooShort => Self::IncompleteData,
            _ => Self::EncodingError,
        }
    }
}

// Manual implementation of Display for no_std environments.
impl core::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FieldLength {
                field,
                expected,
                found,
            } => write!(
                f,
                "The field {} must have byte length of {} (got {})",
                field, expected, found
            ),
            Self::FieldTooLong { field, max, found } => write!(
                f,
                "The field {} must not have more than {} bytes (got {})",
                field, max, found
            ),
            Self::TooManyItems { record, max, found } => write!(
                f,
                "Wrong number of fields in data for {}: {} (max {})",
                record, found, max
            ),
            Self::UnknownField => write!(f, "Unknown field name"),
            Self::ExpectedBytes(field) => write!(f, "The field {} must be a byte string", field),
            Self::ExpectedList(field) => write!(f, "The field {} must be a list", field),
        }
    }
}

impl core::fmt::Display for PlasmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SchemaViolation(v) => write!(f, "Schema violation: {}", v),
            Self::BadLeafValue => write!(f, "Bad hex value for merkle leaf"),
            Self::EncodingError => write!(f, "Recursive length-prefix decoding error"),
            Self::IncompleteData => write!(f, "Incomplete data"),
            Self::TrailingData(n) => write!(f, "Trailing data: {} bytes left after parse", n),
            Self::InvalidTxType(t) => write!(f, "Invalid transaction type: {}", t),
            Self::MalformedTransaction => write!(f, "Malformed transaction"),
            Self::InvalidSignature => write!(f, "Invalid Signature"),
            Self::InvalidPrivateKey => write!(f, "Invalid private key"),
            Self::TransactionCountMismatch { declared, found } => write!(
                f,
                "Transaction count mismatch: header declares {}, found {}",
                declared, found
            ),
            Self::MerkleRootMismatch => write!(f, "Merkle root hash mismatch"),
            Self::InvalidTransactionCount => write!(f, "Invalid number of transactions"),
            Self::InvalidUtxoIdFormat => write!(
                f,
                "Invalid UTXO identifier format (expected decimal or block:tx:output)"
            ),
        }
    }
}

// Enable standard Error trait if the "std" feature is on.
#[cfg(feature = "std")]
impl std::error::Error for PlasmaError {}

#[cfg(feature = "std")]
impl std::error::Error for SchemaViolation {}
