//! Transaction model: canonical encoding, schema enforcement, well-formedness and UTXO ids.

mod common;

use common::{address_of, fund, merge, split, ALICE_KEY, BOB_KEY, OPERATOR_KEY};
use plasma_tx::lengths::{TRANSACTION_INPUT_LENGTH, TRANSACTION_OUTPUT_LENGTH};
use plasma_tx::{
    PlasmaError, PlasmaTransaction, Record, SchemaViolation, SignedTransaction, TransactionInput,
    TransactionOutput, TxType, UtxoId,
};
use primitive_types::U256;
use proptest::prelude::*;

fn input(block: u32, value: u64) -> TransactionInput {
    TransactionInput::new(block, 0, 0, U256::from(value))
}

fn output(n: u8, value: u64) -> TransactionOutput {
    TransactionOutput::new(n, [0x42; 20], U256::from(value))
}

#[test]
fn default_sub_records_have_fixed_encoded_lengths() {
    assert_eq!(TransactionInput::default().encode().len(), TRANSACTION_INPUT_LENGTH);
    assert_eq!(TransactionOutput::default().encode().len(), TRANSACTION_OUTPUT_LENGTH);
    assert_eq!(input(u32::MAX, u64::MAX).encode().len(), TRANSACTION_INPUT_LENGTH);
}

#[test]
fn signed_transactions_round_trip_through_their_encoding() {
    let alice = address_of(&ALICE_KEY);
    let txs = [
        fund(50, alice, &OPERATOR_KEY),
        split((4, 2, 1), &[1, 2, 3], alice, &BOB_KEY),
        merge((1, 0, 0, 7), (1, 1, 0, 8), alice, &ALICE_KEY),
    ];
    for tx in &txs {
        let decoded = SignedTransaction::decode(&tx.encode()).expect("decode");
        assert_eq!(&decoded, tx);
        assert_eq!(decoded.encode(), tx.encode());
        assert_eq!(decoded.hash(), tx.hash());
        assert_eq!(decoded.sender_address(), tx.sender_address());
    }
}

#[test]
fn amounts_keep_full_256_bit_range() {
    let big = U256::MAX - U256::from(1u64);
    let out = TransactionOutput::new(0, [1; 20], big);
    let decoded = TransactionOutput::decode(&out.encode()).expect("decode");
    assert_eq!(decoded.value(), big);
    assert_eq!(decoded.get("valueBuffer").expect("alias").len(), 32);
}

#[test]
fn wrong_width_fields_are_schema_violations() {
    let mut out = TransactionOutput::default();
    assert_eq!(
        out.set("to", &[0xaa; 19]),
        Err(PlasmaError::SchemaViolation(SchemaViolation::FieldLength {
            field: "to",
            expected: 20,
            found: 19,
        }))
    );
    assert_eq!(
        out.set("nonsense", &[1]),
        Err(PlasmaError::SchemaViolation(SchemaViolation::UnknownField))
    );
    out.set("recipient", &[0xaa; 20]).expect("alias");
    assert_eq!(out.to(), &[0xaa; 20]);
}

#[test]
fn extra_items_are_rejected() {
    let mut raw = input(1, 1).raw();
    raw.push(vec![0x01u8].into());
    assert!(matches!(
        TransactionInput::from_raw(raw),
        Err(PlasmaError::SchemaViolation(SchemaViolation::TooManyItems { .. }))
    ));
}

#[test]
fn trailing_bytes_after_an_encoding_are_rejected() {
    let tx = split((1, 0, 0), &[5], [0; 20], &ALICE_KEY);
    let mut bytes = tx.encode();
    bytes.extend_from_slice(&[0xc0, 0xc0]);
    assert_eq!(
        SignedTransaction::decode(&bytes),
        Err(PlasmaError::TrailingData(2))
    );
    let short = &tx.encode()[..10];
    assert_eq!(SignedTransaction::decode(short), Err(PlasmaError::IncompleteData));
}

#[test]
fn corrupt_fields_are_errors_not_defaults() {
    assert_eq!(
        TransactionInput::decode(&[0xc7, 0x84, 0, 0, 0, 1, 0xb9, 0xff]),
        Err(PlasmaError::EncodingError)
    );

    // outputNumber 5 behind a redundant 0x81 prefix
    let mut bytes = TransactionInput::new(1, 0, 5, U256::from(1u64)).encode();
    assert_eq!((bytes[0], bytes[11]), (0xec, 0x05));
    bytes[0] = 0xed;
    bytes.insert(11, 0x81);
    assert_eq!(TransactionInput::decode(&bytes), Err(PlasmaError::EncodingError));
}

#[test]
fn cardinality_rules_per_type() {
    let split_of = |outs: usize| {
        let outputs = (0..outs).map(|i| output(i as u8, 1)).collect();
        PlasmaTransaction::new(TxType::Split, vec![input(1, outs as u64)], outputs)
    };
    assert!(!split_of(0).is_well_formed());
    assert!(split_of(1).is_well_formed());
    assert!(split_of(3).is_well_formed());
    assert!(!split_of(4).is_well_formed());

    let merge_one_input =
        PlasmaTransaction::new(TxType::Merge, vec![input(1, 2)], vec![output(0, 2)]);
    assert!(!merge_one_input.is_well_formed());

    let null = PlasmaTransaction::new(TxType::Null, vec![], vec![]);
    assert!(!null.is_well_formed());
}

#[test]
fn value_rules_apply_to_split_and_merge() {
    let unbalanced = PlasmaTransaction::new(
        TxType::Merge,
        vec![input(1, 2), input(2, 3)],
        vec![output(0, 4)],
    );
    assert!(!unbalanced.is_well_formed());

    let zero_output =
        PlasmaTransaction::new(TxType::Split, vec![input(1, 2)], vec![output(0, 2), output(1, 0)]);
    assert!(!zero_output.is_well_formed());

    let misnumbered =
        PlasmaTransaction::new(TxType::Split, vec![input(1, 2)], vec![output(0, 1), output(2, 1)]);
    assert!(!misnumbered.is_well_formed());

    let overflow = PlasmaTransaction::new(
        TxType::Merge,
        vec![
            TransactionInput::new(1, 0, 0, U256::MAX),
            TransactionInput::new(2, 0, 0, U256::one()),
        ],
        vec![TransactionOutput::new(0, [0; 20], U256::MAX)],
    );
    assert!(!overflow.is_well_formed(), "input sum overflow must not wrap");
}

#[test]
fn fund_transactions_skip_value_rules() {
    let deposit = PlasmaTransaction::new(
        TxType::Fund,
        vec![TransactionInput::default()],
        vec![output(0, 100)],
    );
    assert!(deposit.is_well_formed());
    assert!(deposit.is_funding());

    let spending = PlasmaTransaction::new(TxType::Fund, vec![input(3, 1)], vec![output(0, 100)]);
    assert!(spending.is_well_formed());
    assert!(!spending.is_funding());
}

#[test]
fn unknown_type_bytes_are_malformed() {
    let mut tx = PlasmaTransaction::new(TxType::Split, vec![input(1, 1)], vec![output(0, 1)]);
    tx.set("txType", &[3]).expect("byte fits");
    assert_eq!(tx.tx_type(), Err(PlasmaError::InvalidTxType(3)));
    assert!(!tx.is_well_formed());
}

#[test]
fn transaction_key_concatenates_input_keys() {
    let tx = PlasmaTransaction::new(
        TxType::Merge,
        vec![TransactionInput::new(1, 2, 3, U256::from(1u64)), input(4, 1)],
        vec![output(0, 2)],
    );
    assert_eq!(tx.key(), "000000010000000203000000040000000000");
    assert_eq!(tx.input(0).map(TransactionInput::key).as_deref(), Some("000000010000000203"));
}

#[test]
fn utxo_ids_parse_from_both_notations() {
    let id = UtxoId::from_parts(12, 3, 1);
    assert_eq!(id.to_string().parse::<UtxoId>(), Ok(id));
    assert_eq!("12:3:1".parse::<UtxoId>(), Ok(id));
    assert_eq!(id.block_number(), 12);
    assert_eq!(id.tx_number(), 3);
    assert_eq!(id.output_number(), 1);

    assert_eq!("1:2".parse::<UtxoId>(), Err(PlasmaError::InvalidUtxoIdFormat));
    assert_eq!("1:2:256".parse::<UtxoId>(), Err(PlasmaError::InvalidUtxoIdFormat));
    assert_eq!(
        (1u128 << 72).to_string().parse::<UtxoId>(),
        Err(PlasmaError::InvalidUtxoIdFormat)
    );
    assert_eq!(input(12, 9).utxo_id(), UtxoId::from_parts(12, 0, 0));
}

#[test]
fn content_hash_differs_from_plain_digest() {
    let tx = PlasmaTransaction::new(TxType::Split, vec![input(1, 1)], vec![output(0, 1)]);
    assert_eq!(tx.hash(), tx.content_hash());
    assert_ne!(
        tx.hash().to_vec(),
        tx.digest(plasma_tx::HashType::Keccak256),
        "identity hash carries the personal-message prefix"
    );
}

proptest! {
    #[test]
    fn arbitrary_split_survives_decoding(
        block in any::<u32>(),
        tx_number in any::<u32>(),
        out in any::<u8>(),
        to in any::<[u8; 20]>(),
        values in prop::collection::vec(1u64..=u64::MAX / 4, 1..=3),
    ) {
        let signed = split((block, tx_number, out), &values, to, &ALICE_KEY);
        let decoded = SignedTransaction::decode(&signed.encode()).expect("decode");
        prop_assert!(decoded.is_well_formed());
        prop_assert_eq!(decoded.transaction().input(0).map(TransactionInput::utxo_id),
            Some(UtxoId::from_parts(block, tx_number, out)));
        prop_assert_eq!(&decoded, &signed);
    }
}
