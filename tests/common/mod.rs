//! Shared test fixtures: fixed keys and builders for signed Split, Merge and Fund transactions.

#![allow(dead_code)]

use plasma_tx::signature::private_key_to_address;
use plasma_tx::{
    PlasmaTransaction, SignedTransaction, TransactionInput, TransactionOutput, TxType,
};
use primitive_types::U256;

pub const ALICE_KEY: [u8; 32] = [0x11; 32];
pub const BOB_KEY: [u8; 32] = [0x22; 32];
pub const OPERATOR_KEY: [u8; 32] = [0x77; 32];

pub fn address_of(key: &[u8; 32]) -> [u8; 20] {
    private_key_to_address(key).expect("valid test key")
}

fn sign(tx: PlasmaTransaction, key: &[u8; 32]) -> SignedTransaction {
    let mut signed = SignedTransaction::new(tx);
    signed.sign(key).expect("sign");
    signed
}

/// One input at `(block, tx, out)` split into outputs of the given values, all paid to `to`.
pub fn split(
    (block, tx, out): (u32, u32, u8),
    values: &[u64],
    to: [u8; 20],
    key: &[u8; 32],
) -> SignedTransaction {
    let total: u64 = values.iter().sum();
    let outputs = values
        .iter()
        .enumerate()
        .map(|(i, v)| TransactionOutput::new(i as u8, to, U256::from(*v)))
        .collect();
    sign(
        PlasmaTransaction::new(
            TxType::Split,
            vec![TransactionInput::new(block, tx, out, U256::from(total))],
            outputs,
        ),
        key,
    )
}

/// Two `(block, tx, out, value)` inputs merged into one output carrying their sum.
pub fn merge(
    first: (u32, u32, u8, u64),
    second: (u32, u32, u8, u64),
    to: [u8; 20],
    key: &[u8; 32],
) -> SignedTransaction {
    let inputs = vec![
        TransactionInput::new(first.0, first.1, first.2, U256::from(first.3)),
        TransactionInput::new(second.0, second.1, second.2, U256::from(second.3)),
    ];
    let output = TransactionOutput::new(0, to, U256::from(first.3 + second.3));
    sign(PlasmaTransaction::new(TxType::Merge, inputs, vec![output]), key)
}

/// Deposit crediting `value` to `to`, spending the all-zero UTXO.
pub fn fund(value: u64, to: [u8; 20], key: &[u8; 32]) -> SignedTransaction {
    sign(
        PlasmaTransaction::new(
            TxType::Fund,
            vec![TransactionInput::new(0, 0, 0, U256::from(value))],
            vec![TransactionOutput::new(0, to, U256::from(value))],
        ),
        key,
    )
}

/// A deposit, a split of it, and a merge of the split outputs.
pub fn sample_batch() -> Vec<SignedTransaction> {
    let alice = address_of(&ALICE_KEY);
    let bob = address_of(&BOB_KEY);
    vec![
        fund(1_000, alice, &OPERATOR_KEY),
        split((1, 0, 0), &[600, 400], bob, &ALICE_KEY),
        merge((2, 1, 0, 600), (2, 1, 1, 400), alice, &BOB_KEY),
    ]
}
