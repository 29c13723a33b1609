//! Fixed byte widths of every wire field.

pub const BLOCK_NUMBER_LENGTH: usize = 4;
pub const TX_NUMBER_LENGTH: usize = 4;
pub const TX_TYPE_LENGTH: usize = 1;
pub const SIGNATURE_V_LENGTH: usize = 1;
pub const SIGNATURE_R_LENGTH: usize = 32;
pub const SIGNATURE_S_LENGTH: usize = 32;
pub const MERKLE_ROOT_LENGTH: usize = 32;
pub const PREVIOUS_HASH_LENGTH: usize = 32;
pub const TX_OUTPUT_NUMBER_LENGTH: usize = 1;
pub const TX_AMOUNT_LENGTH: usize = 32;
pub const TX_TO_ADDRESS_LENGTH: usize = 20;

/// Encoded length of a default (all-zero) `TransactionInput`.
pub const TRANSACTION_INPUT_LENGTH: usize = 45;

/// Encoded length of a default (all-zero) `TransactionOutput`.
pub const TRANSACTION_OUTPUT_LENGTH: usize = 56;

/// Raw header: number, tx count, parent hash, merkle root, v, r, s.
pub const BLOCK_HEADER_LENGTH: usize = BLOCK_NUMBER_LENGTH
    + TX_NUMBER_LENGTH
    + PREVIOUS_HASH_LENGTH
    + MERKLE_ROOT_LENGTH
    + SIGNATURE_V_LENGTH
    + SIGNATURE_R_LENGTH
    + SIGNATURE_S_LENGTH;

pub const BLOCK_HEADER_ITEMS: usize = 7;

/// Header fields in wire order, as byte widths.
pub const BLOCK_HEADER_LAYOUT: [usize; BLOCK_HEADER_ITEMS] = [
    BLOCK_NUMBER_LENGTH,
    TX_NUMBER_LENGTH,
    PREVIOUS_HASH_LENGTH,
    MERKLE_ROOT_LENGTH,
    SIGNATURE_V_LENGTH,
    SIGNATURE_R_LENGTH,
    SIGNATURE_S_LENGTH,
];
