use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::OnceCell;

use primitive_types::U256;

use crate::codec::{fixed, FieldSpec, RawItem, Record, Schema};
use crate::error::{PlasmaError, SchemaViolation};
use crate::lengths::{TX_AMOUNT_LENGTH, TX_OUTPUT_NUMBER_LENGTH, TX_TO_ADDRESS_LENGTH};

const FIELDS: [FieldSpec; 3] = [
    FieldSpec::fixed(
        "outputNumberInTransaction",
        Some("outputNum"),
        TX_OUTPUT_NUMBER_LENGTH,
        true,
    ),
    FieldSpec::fixed("to", Some("recipient"), TX_TO_ADDRESS_LENGTH, true),
    FieldSpec::fixed("amountBuffer", Some("valueBuffer"), TX_AMOUNT_LENGTH, true),
];

/// A newly created, spendable amount assigned to a recipient address.
#[derive(Debug, Clone, Default)]
pub struct TransactionOutput {
    output_number_in_transaction: [u8; TX_OUTPUT_NUMBER_LENGTH],
    to: [u8; TX_TO_ADDRESS_LENGTH],
    amount: [u8; TX_AMOUNT_LENGTH],
    key: OnceCell<String>,
}

impl TransactionOutput {
    pub fn new(output_number: u8, to: [u8; TX_TO_ADDRESS_LENGTH], value: U256) -> Self {
        let mut output = Self {
            output_number_in_transaction: [output_number],
            to,
            ..Self::default()
        };
        value.to_big_endian(&mut output.amount);
        output
    }

    pub fn output_number_in_transaction(&self) -> u8 {
        self.output_number_in_transaction[0]
    }

    pub fn to(&self) -> &[u8; TX_TO_ADDRESS_LENGTH] {
        &self.to
    }

    pub fn amount_bytes(&self) -> &[u8; TX_AMOUNT_LENGTH] {
        &self.amount
    }

    pub fn value(&self) -> U256 {
        U256::from_big_endian(&self.amount)
    }

    /// Hex of output number followed by recipient. Computed once.
    pub fn key(&self) -> &str {
        self.key.get_or_init(|| {
            let mut bytes = Vec::with_capacity(1 + TX_TO_ADDRESS_LENGTH);
            bytes.extend_from_slice(&self.output_number_in_transaction);
            bytes.extend_from_slice(&self.to);
            hex::encode(bytes)
        })
    }
}

impl PartialEq for TransactionOutput {
    fn eq(&self, other: &Self) -> bool {
        self.output_number_in_transaction == other.output_number_in_transaction
            && self.to == other.to
            && self.amount == other.amount
    }
}

impl Eq for TransactionOutput {}

impl Record for TransactionOutput {
    const SCHEMA: Schema = Schema::new("TransactionOutput", &FIELDS);

    fn raw(&self) -> Vec<RawItem> {
        vec![
            self.output_number_in_transaction.to_vec().into(),
            self.to.to_vec().into(),
            self.amount.to_vec().into(),
        ]
    }

    fn assign(&mut self, index: usize, value: Option<Vec<u8>>) -> Result<(), PlasmaError> {
        match index {
            0 => self.output_number_in_transaction = fixed(value),
            1 => self.to = fixed(value),
            2 => self.amount = fixed(value),
            _ => return Err(SchemaViolation::UnknownField.into()),
        }
        self.key = OnceCell::new();
        Ok(())
    }
}
