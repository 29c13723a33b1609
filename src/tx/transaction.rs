use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::OnceCell;

use primitive_types::U256;

use crate::codec::{
    fixed, nested_array, nested_array_raw, FieldSpec, RawItem, Record, Schema,
};
use crate::error::{PlasmaError, SchemaViolation};
use crate::lengths::TX_TYPE_LENGTH;
use crate::tx::{TransactionInput, TransactionOutput, TxType, UtxoId};

const FIELDS: [FieldSpec; 3] = [
    FieldSpec::fixed("transactionType", Some("txType"), TX_TYPE_LENGTH, true),
    FieldSpec::nested_array("inputs"),
    FieldSpec::nested_array("outputs"),
];

/// An unsigned transaction: a type byte plus ordered inputs and outputs.
#[derive(Debug, Clone, Default)]
pub struct PlasmaTransaction {
    transaction_type: [u8; TX_TYPE_LENGTH],
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    key: OnceCell<String>,
}

impl PlasmaTransaction {
    pub fn new(
        tx_type: TxType,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Self {
        Self {
            transaction_type: [tx_type.into()],
            inputs,
            outputs,
            key: OnceCell::new(),
        }
    }

    /// The Null-typed transaction with no inputs and no outputs.
    pub fn empty() -> Self {
        Self::new(TxType::Null, Vec::new(), Vec::new())
    }

    /// Raw type byte, which may not name a known [`TxType`] on decoded data.
    pub fn transaction_type_byte(&self) -> u8 {
        self.transaction_type[0]
    }

    pub fn tx_type(&self) -> Result<TxType, PlasmaError> {
        TxType::try_from(self.transaction_type[0])
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&TransactionInput> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&TransactionOutput> {
        self.outputs.get(index)
    }

    /// Concatenated keys of the first two inputs, for cheap conflict detection.
    pub fn key(&self) -> &str {
        self.key.get_or_init(|| {
            self.inputs
                .iter()
                .take(2)
                .map(TransactionInput::key)
                .collect::<Vec<_>>()
                .concat()
        })
    }

    /// A Fund transaction whose single input points at the all-zero UTXO.
    pub fn is_funding(&self) -> bool {
        self.tx_type() == Ok(TxType::Fund)
            && self
                .inputs
                .first()
                .is_some_and(|input| input.utxo_id() == UtxoId::default())
    }

    /// Structural and accounting checks.
    ///
    /// - Merge: exactly 2 inputs and 1 output.
    /// - Split: exactly 1 input and 1 to 3 outputs.
    /// - Fund: exactly 1 input and 1 output; value rules do not apply.
    /// - Any other type is malformed.
    ///
    /// For Split and Merge every output must carry a positive value, outputs must be numbered
    /// 0, 1, 2... in order, and the output total must equal the input total.
    pub fn is_well_formed(&self) -> bool {
        let Ok(tx_type) = self.tx_type() else {
            return false;
        };
        let (num_inputs, num_outputs) = (self.inputs.len(), self.outputs.len());
        let cardinality_ok = match tx_type {
            TxType::Merge | TxType::Fund => {
                num_inputs == tx_type.max_inputs() && num_outputs == tx_type.max_outputs()
            }
            TxType::Split => {
                num_inputs == tx_type.max_inputs()
                    && (1..=tx_type.max_outputs()).contains(&num_outputs)
            }
            TxType::Null => false,
        };
        if !cardinality_ok {
            return false;
        }
        if tx_type == TxType::Fund {
            return true;
        }

        let mut inputs_total = U256::zero();
        for input in &self.inputs {
            match inputs_total.checked_add(input.value()) {
                Some(total) => inputs_total = total,
                None => return false,
            }
        }

        let mut outputs_total = U256::zero();
        for (counter, output) in self.outputs.iter().enumerate() {
            let value = output.value();
            if value.is_zero() {
                return false;
            }
            if usize::from(output.output_number_in_transaction()) != counter {
                return false;
            }
            match outputs_total.checked_add(value) {
                Some(total) => outputs_total = total,
                None => return false,
            }
        }
        outputs_total == inputs_total
    }

    /// Identity hash: personal-message hash of the encoding.
    pub fn hash(&self) -> [u8; 32] {
        self.content_hash()
    }
}

impl PartialEq for PlasmaTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.transaction_type == other.transaction_type
            && self.inputs == other.inputs
            && self.outputs == other.outputs
    }
}

impl Eq for PlasmaTransaction {}

impl Record for PlasmaTransaction {
    const SCHEMA: Schema = Schema::new("PlasmaTransaction", &FIELDS);

    fn raw(&self) -> Vec<RawItem> {
        vec![
            self.transaction_type.to_vec().into(),
            nested_array_raw(&self.inputs),
            nested_array_raw(&self.outputs),
        ]
    }

    fn assign(&mut self, index: usize, value: Option<Vec<u8>>) -> Result<(), PlasmaError> {
        match index {
            0 => self.transaction_type = fixed(value),
            1 => return Err(SchemaViolation::ExpectedList("inputs").into()),
            2 => return Err(SchemaViolation::ExpectedList("outputs").into()),
            _ => return Err(SchemaViolation::UnknownField.into()),
        }
        Ok(())
    }

    fn assign_nested(&mut self, index: usize, item: RawItem) -> Result<(), PlasmaError> {
        match index {
            1 => self.inputs = nested_array(item)?,
            2 => self.outputs = nested_array(item)?,
            _ => return Err(SchemaViolation::ExpectedBytes("transactionType").into()),
        }
        self.key = OnceCell::new();
        Ok(())
    }
}
