//! Merkle proof soundness across every tree discipline and digest.
//!
//! Every leaf's proof must fold back to the root, and any single flipped bit in the target,
//! a sibling or the root must make validation fail.

use plasma_tx::{HashType, LeafValue, MerkleTree, ProofElement, SignedTransaction, TreeDiscipline};
use proptest::prelude::*;

fn disciplines() -> Vec<TreeDiscipline> {
    vec![
        TreeDiscipline::Standard { double_hash: false },
        TreeDiscipline::Standard { double_hash: true },
        TreeDiscipline::Bitcoin { double_hash: false },
        TreeDiscipline::Bitcoin { double_hash: true },
        TreeDiscipline::Plasma {
            padding: SignedTransaction::empty_encoding(),
        },
    ]
}

fn built(hash_type: HashType, leaves: &[Vec<u8>], discipline: &TreeDiscipline) -> MerkleTree {
    let mut tree = MerkleTree::new(hash_type);
    tree.add_leaves(leaves.iter().map(|l| LeafValue::Bytes(l.as_slice())), true)
        .expect("byte leaves never fail");
    tree.build(discipline);
    tree
}

fn flip(bytes: &[u8], bit: usize) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let bit = bit % (out.len() * 8);
    out[bit / 8] ^= 1 << (bit % 8);
    out
}

fn with_flipped_sibling(path: &[ProofElement], at: usize, bit: usize) -> Vec<ProofElement> {
    let mut path = path.to_vec();
    let at = at % path.len();
    path[at] = match &path[at] {
        ProofElement::Left(s) => ProofElement::Left(flip(s, bit)),
        ProofElement::Right(s) => ProofElement::Right(flip(s, bit)),
    };
    path
}

fn arb_hash_type() -> impl Strategy<Value = HashType> {
    prop_oneof![
        Just(HashType::Sha256),
        Just(HashType::Sha3_224),
        Just(HashType::Sha3_256),
        Just(HashType::Sha3_384),
        Just(HashType::Sha3_512),
        Just(HashType::Keccak256),
    ]
}

fn arb_leaves() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..48), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_leaf_proof_validates(hash_type in arb_hash_type(), leaves in arb_leaves()) {
        for discipline in disciplines() {
            let tree = built(hash_type, &leaves, &discipline);
            let root = tree.merkle_root().expect("non-empty tree has a root").to_vec();
            prop_assert_eq!(root.len(), hash_type.output_len());

            for index in 0..leaves.len() {
                let target = tree.leaf(index).expect("leaf").to_vec();
                let path = tree.proof(index).expect("proof in range");
                prop_assert!(
                    tree.validate_proof(&path, &target, &root),
                    "{:?} leaf {} of {}", discipline, index, leaves.len()
                );
                let binary = tree.binary_proof(index).expect("binary proof");
                prop_assert_eq!(binary.len(), path.len() * (1 + hash_type.output_len()));
                prop_assert!(tree.validate_binary_proof(&binary, &target, &root));
            }
            prop_assert!(tree.proof(leaves.len()).is_none());
        }
    }

    #[test]
    fn single_bit_flips_are_rejected(
        hash_type in arb_hash_type(),
        leaves in arb_leaves(),
        pick in any::<usize>(),
        bit in any::<usize>(),
    ) {
        for discipline in disciplines() {
            let tree = built(hash_type, &leaves, &discipline);
            let root = tree.merkle_root().expect("root").to_vec();
            let index = pick % leaves.len();
            let target = tree.leaf(index).expect("leaf").to_vec();
            let path = tree.proof(index).expect("proof");

            prop_assert!(!tree.validate_proof(&path, &flip(&target, bit), &root));
            prop_assert!(!tree.validate_proof(&path, &target, &flip(&root, bit)));
            if !path.is_empty() {
                let bad = with_flipped_sibling(&path, pick, bit);
                prop_assert!(!tree.validate_proof(&bad, &target, &root));
            }
        }
    }

    #[test]
    fn plasma_root_depends_on_leaf_count(leaves in prop::collection::vec(any::<[u8; 32]>(), 2..33)) {
        let padding = SignedTransaction::empty_encoding();
        let mut roots = Vec::new();
        for n in 1..=leaves.len() {
            let mut tree = MerkleTree::new(HashType::Keccak256);
            tree.add_leaves(leaves[..n].iter().map(|l| LeafValue::Bytes(&l[..])), false)
                .expect("leaves");
            tree.make_plasma_tree(&padding);
            roots.push(tree.merkle_root().expect("root").to_vec());
        }
        for (i, a) in roots.iter().enumerate() {
            for b in &roots[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }
}

#[test]
fn plasma_tree_is_deterministic() {
    let leaves: Vec<[u8; 32]> = (0u8..5).map(|i| [i; 32]).collect();
    let build = || {
        let mut tree = MerkleTree::new(HashType::Keccak256);
        tree.add_leaves(leaves.iter().map(|l| LeafValue::Bytes(&l[..])), false)
            .expect("leaves");
        tree.make_plasma_tree(&SignedTransaction::empty_encoding());
        tree.merkle_root().expect("root").to_vec()
    };
    assert_eq!(build(), build());
}

#[test]
fn bitcoin_duplication_collides_where_plasma_padding_does_not() {
    let three: [&[u8]; 3] = [&b"a"[..], &b"b"[..], &b"c"[..]];
    let four: [&[u8]; 4] = [&b"a"[..], &b"b"[..], &b"c"[..], &b"c"[..]];
    let root = |leaves: &[&[u8]], discipline: &TreeDiscipline| {
        let mut tree = MerkleTree::new(HashType::Keccak256);
        tree.add_leaves(leaves.iter().map(|l| LeafValue::Bytes(*l)), true)
            .expect("leaves");
        tree.build(discipline);
        tree.merkle_root().expect("root").to_vec()
    };

    let btc = TreeDiscipline::Bitcoin { double_hash: false };
    assert_eq!(root(&three[..], &btc), root(&four[..], &btc), "known duplicate-leaf ambiguity");

    let plasma = TreeDiscipline::Plasma {
        padding: SignedTransaction::empty_encoding(),
    };
    assert_ne!(root(&three[..], &plasma), root(&four[..], &plasma));
}

#[test]
fn hex_and_byte_leaves_agree() {
    let mut from_hex = MerkleTree::new(HashType::Sha256);
    from_hex
        .add_leaves([LeafValue::Hex("deadbeef"), LeafValue::Hex("00ff")], true)
        .expect("hex leaves");
    from_hex.make_tree(false);

    let mut from_bytes = MerkleTree::new(HashType::Sha256);
    from_bytes
        .add_leaves(
            [LeafValue::Bytes(&[0xde, 0xad, 0xbe, 0xef]), LeafValue::Bytes(&[0x00, 0xff])],
            true,
        )
        .expect("byte leaves");
    from_bytes.make_tree(false);

    assert_eq!(from_hex.merkle_root(), from_bytes.merkle_root());
    assert!(MerkleTree::new(HashType::Sha256)
        .add_leaf(LeafValue::Hex("abc"), false)
        .is_err());
}

#[test]
fn malformed_binary_proofs_are_invalid_not_errors() {
    let mut tree = MerkleTree::new(HashType::Sha256);
    tree.add_leaves([LeafValue::Bytes(b"x"), LeafValue::Bytes(b"y")], true)
        .expect("leaves");
    tree.make_tree(false);
    let root = tree.merkle_root().expect("root").to_vec();
    let target = tree.leaf(0).expect("leaf").to_vec();
    let proof = tree.binary_proof(0).expect("proof");

    assert!(tree.validate_binary_proof(&proof, &target, &root));
    assert!(!tree.validate_binary_proof(&proof[..proof.len() - 1], &target, &root));
    let mut bad_direction = proof.clone();
    bad_direction[0] = 0x07;
    assert!(!tree.validate_binary_proof(&bad_direction, &target, &root));
}

#[test]
fn empty_tree_has_no_root() {
    let mut tree = MerkleTree::new(HashType::Keccak256);
    assert!(tree.merkle_root().is_none(), "unbuilt");
    tree.make_tree(false);
    assert!(tree.is_ready());
    assert!(tree.merkle_root().is_none());
    assert!(tree.proof(0).is_none());
}
