use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use byteorder::{BigEndian, ByteOrder};
use primitive_types::U256;

use crate::codec::{fixed, FieldSpec, RawItem, Record, Schema};
use crate::error::{PlasmaError, SchemaViolation};
use crate::lengths::{BLOCK_NUMBER_LENGTH, TX_AMOUNT_LENGTH, TX_NUMBER_LENGTH, TX_OUTPUT_NUMBER_LENGTH};
use crate::tx::UtxoId;

const FIELDS: [FieldSpec; 4] = [
    FieldSpec::fixed("blockNumber", Some("block"), BLOCK_NUMBER_LENGTH, true),
    FieldSpec::fixed("txNumberInBlock", Some("txNum"), TX_NUMBER_LENGTH, true),
    FieldSpec::fixed(
        "outputNumberInTransaction",
        Some("outputNum"),
        TX_OUTPUT_NUMBER_LENGTH,
        true,
    ),
    FieldSpec::fixed("amountBuffer", Some("valueBuffer"), TX_AMOUNT_LENGTH, true),
];

/// Reference to a previously created output, with the value it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    block_number: [u8; BLOCK_NUMBER_LENGTH],
    tx_number_in_block: [u8; TX_NUMBER_LENGTH],
    output_number_in_transaction: [u8; TX_OUTPUT_NUMBER_LENGTH],
    amount: [u8; TX_AMOUNT_LENGTH],
}

impl TransactionInput {
    pub fn new(block_number: u32, tx_number_in_block: u32, output_number: u8, value: U256) -> Self {
        let mut input = Self::default();
        BigEndian::write_u32(&mut input.block_number, block_number);
        BigEndian::write_u32(&mut input.tx_number_in_block, tx_number_in_block);
        input.output_number_in_transaction = [output_number];
        value.to_big_endian(&mut input.amount);
        input
    }

    pub fn block_number(&self) -> u32 {
        BigEndian::read_u32(&self.block_number)
    }

    pub fn tx_number_in_block(&self) -> u32 {
        BigEndian::read_u32(&self.tx_number_in_block)
    }

    pub fn output_number_in_transaction(&self) -> u8 {
        self.output_number_in_transaction[0]
    }

    pub fn amount_bytes(&self) -> &[u8; TX_AMOUNT_LENGTH] {
        &self.amount
    }

    pub fn value(&self) -> U256 {
        U256::from_big_endian(&self.amount)
    }

    pub fn utxo_id(&self) -> UtxoId {
        UtxoId::from_parts(
            self.block_number(),
            self.tx_number_in_block(),
            self.output_number_in_transaction(),
        )
    }

    /// Hex of block number, tx number and output number: identifies the spent output.
    pub fn key(&self) -> String {
        let mut bytes = Vec::with_capacity(BLOCK_NUMBER_LENGTH + TX_NUMBER_LENGTH + 1);
        bytes.extend_from_slice(&self.block_number);
        bytes.extend_from_slice(&self.tx_number_in_block);
        bytes.extend_from_slice(&self.output_number_in_transaction);
        hex::encode(bytes)
    }
}

impl Record for TransactionInput {
    const SCHEMA: Schema = Schema::new("TransactionInput", &FIELDS);

    fn raw(&self) -> Vec<RawItem> {
        vec![
            self.block_number.to_vec().into(),
            self.tx_number_in_block.to_vec().into(),
            self.output_number_in_transaction.to_vec().into(),
            self.amount.to_vec().into(),
        ]
    }

    fn assign(&mut self, index: usize, value: Option<Vec<u8>>) -> Result<(), PlasmaError> {
        match index {
            0 => self.block_number = fixed(value),
            1 => self.tx_number_in_block = fixed(value),
            2 => self.output_number_in_transaction = fixed(value),
            3 => self.amount = fixed(value),
            _ => return Err(SchemaViolation::UnknownField.into()),
        }
        Ok(())
    }
}
