//! UTXO transaction model: inputs, outputs, typed transactions and their signed envelope.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::PlasmaError;
use crate::lengths::{TX_NUMBER_LENGTH, TX_OUTPUT_NUMBER_LENGTH};

pub mod input;
pub mod output;
pub mod signed;
pub mod transaction;

pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use signed::SignedTransaction;
pub use transaction::PlasmaTransaction;

// -----------------------------------------------------------------------------
// TxType
// -----------------------------------------------------------------------------

/// Transaction kind, stored as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxType {
    Null = 0,
    Split = 1,
    Merge = 2,
    Fund = 4,
}

impl TxType {
    /// Exact input count a well-formed transaction of this type carries.
    pub const fn max_inputs(self) -> usize {
        match self {
            TxType::Null => 0,
            TxType::Split | TxType::Fund => 1,
            TxType::Merge => 2,
        }
    }

    /// Upper bound on outputs. Split accepts one up to this many; the others need exactly this.
    pub const fn max_outputs(self) -> usize {
        match self {
            TxType::Null => 0,
            TxType::Merge | TxType::Fund => 1,
            TxType::Split => 3,
        }
    }
}

impl TryFrom<u8> for TxType {
    type Error = PlasmaError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TxType::Null),
            1 => Ok(TxType::Split),
            2 => Ok(TxType::Merge),
            4 => Ok(TxType::Fund),
            other => Err(PlasmaError::InvalidTxType(other)),
        }
    }
}

impl From<TxType> for u8 {
    fn from(t: TxType) -> u8 {
        t as u8
    }
}

// -----------------------------------------------------------------------------
// UtxoId
// -----------------------------------------------------------------------------

const TX_SHIFT: u32 = (TX_OUTPUT_NUMBER_LENGTH * 8) as u32;
const BLOCK_SHIFT: u32 = ((TX_OUTPUT_NUMBER_LENGTH + TX_NUMBER_LENGTH) * 8) as u32;

/// Packed output reference: `block << 40 | tx << 8 | output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UtxoId(u128);

impl UtxoId {
    pub const fn from_parts(block_number: u32, tx_number: u32, output_number: u8) -> Self {
        Self(
            ((block_number as u128) << BLOCK_SHIFT)
                | ((tx_number as u128) << TX_SHIFT)
                | output_number as u128,
        )
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }

    pub const fn block_number(self) -> u32 {
        (self.0 >> BLOCK_SHIFT) as u32
    }

    pub const fn tx_number(self) -> u32 {
        (self.0 >> TX_SHIFT) as u32
    }

    pub const fn output_number(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UtxoId {
    type Err = PlasmaError;

    /// Accepts the packed decimal form or `block:tx:output`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(':') {
            let value = s.parse::<u128>().map_err(|_| PlasmaError::InvalidUtxoIdFormat)?;
            // block number occupies 32 bits above the shift
            if value >> (BLOCK_SHIFT + 32) != 0 {
                return Err(PlasmaError::InvalidUtxoIdFormat);
            }
            return Ok(Self(value));
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(PlasmaError::InvalidUtxoIdFormat);
        }
        let block = parts[0]
            .parse::<u32>()
            .map_err(|_| PlasmaError::InvalidUtxoIdFormat)?;
        let tx = parts[1]
            .parse::<u32>()
            .map_err(|_| PlasmaError::InvalidUtxoIdFormat)?;
        let out = parts[2]
            .parse::<u8>()
            .map_err(|_| PlasmaError::InvalidUtxoIdFormat)?;
        Ok(Self::from_parts(block, tx, out))
    }
}
