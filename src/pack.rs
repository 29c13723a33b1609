//! Block framing (pack / unpack). The header's fixed-width bytes come first, followed by the
//! length-prefixed list whose items are each signed transaction's own encoding as a byte string.
//! Symmetric to each other; integrity checks live in `Block::from_bytes`.

use alloc::vec::Vec;

use crate::codec::{decode_item, encode_byte_list, RawItem, Record};
use crate::error::{PlasmaError, SchemaViolation};
use crate::header::BlockHeader;
use crate::lengths::BLOCK_HEADER_LENGTH;
use crate::tx::SignedTransaction;

/// Packs a header and its transactions into the block wire form.
pub fn pack_block(header: &BlockHeader, transactions: &[SignedTransaction]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = transactions.iter().map(|tx| tx.encode()).collect();
    let body = encode_byte_list(&encoded);

    let mut out = Vec::with_capacity(BLOCK_HEADER_LENGTH + body.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&body);
    out
}

/// Splits block bytes into the header and the decoded transactions without checking
/// well-formedness, counts or the merkle root.
pub fn unpack_block(bytes: &[u8]) -> Result<(BlockHeader, Vec<SignedTransaction>), PlasmaError> {
    // 1. Fixed-width header
    let header = BlockHeader::from_bytes(bytes)?;

    // 2. Transaction list
    let RawItem::List(items) = decode_item(&bytes[BLOCK_HEADER_LENGTH..])? else {
        return Err(SchemaViolation::ExpectedList("transactions").into());
    };

    // 3. Each item carries one signed transaction's encoding
    let transactions = items
        .into_iter()
        .map(|item| match item {
            RawItem::Bytes(encoded) => SignedTransaction::decode(&encoded),
            RawItem::List(_) => Err(SchemaViolation::ExpectedBytes("transactions").into()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((header, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn empty_block_body_is_empty_list() {
        let header = BlockHeader::new(1, 0, [0; 32], [0; 32]);
        let bytes = pack_block(&header, &[]);
        assert_eq!(bytes.len(), BLOCK_HEADER_LENGTH + 1);
        assert_eq!(bytes[BLOCK_HEADER_LENGTH], 0xc0);
        let (parsed, txs) = unpack_block(&bytes).expect("unpack");
        assert_eq!(parsed, header);
        assert!(txs.is_empty());
    }

    #[test]
    fn transactions_are_wrapped_as_byte_strings() {
        let header = BlockHeader::new(1, 1, [0; 32], [0; 32]);
        let tx = SignedTransaction::empty();
        let bytes = pack_block(&header, &[tx.clone()]);
        let body = decode_item(&bytes[BLOCK_HEADER_LENGTH..]).expect("body");
        assert_eq!(body, RawItem::List(vec![RawItem::Bytes(tx.encode())]));

        let (_, txs) = unpack_block(&bytes).expect("unpack");
        assert_eq!(txs, vec![tx]);
    }

    #[test]
    fn inline_lists_are_rejected() {
        let header = BlockHeader::new(1, 1, [0; 32], [0; 32]);
        let mut bytes = header.to_bytes().to_vec();
        // list containing the empty list
        bytes.extend_from_slice(&[0xc1, 0xc0]);
        assert_eq!(
            unpack_block(&bytes),
            Err(PlasmaError::SchemaViolation(SchemaViolation::ExpectedBytes("transactions")))
        );
    }

    #[test]
    fn trailing_bytes_after_body_are_rejected() {
        let header = BlockHeader::new(1, 0, [0; 32], [0; 32]);
        let mut bytes = pack_block(&header, &[]);
        bytes.push(0x01);
        assert_eq!(unpack_block(&bytes), Err(PlasmaError::TrailingData(1)));
    }
}
