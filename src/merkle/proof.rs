use alloc::vec::Vec;

/// Binary direction byte: the sibling sits to the left of the running hash.
pub const DIRECTION_LEFT: u8 = 0x00;
/// Binary direction byte: the sibling sits to the right of the running hash.
pub const DIRECTION_RIGHT: u8 = 0x01;

/// One step of an inclusion proof, named by the side the sibling sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofElement {
    Left(Vec<u8>),
    Right(Vec<u8>),
}

impl ProofElement {
    pub fn sibling(&self) -> &[u8] {
        match self {
            ProofElement::Left(s) | ProofElement::Right(s) => s,
        }
    }

    pub fn direction(&self) -> u8 {
        match self {
            ProofElement::Left(_) => DIRECTION_LEFT,
            ProofElement::Right(_) => DIRECTION_RIGHT,
        }
    }
}

/// Concatenates `direction ++ sibling` chunks.
pub fn to_binary(path: &[ProofElement]) -> Vec<u8> {
    let mut out = Vec::with_capacity(path.iter().map(|e| 1 + e.sibling().len()).sum());
    for element in path {
        out.push(element.direction());
        out.extend_from_slice(element.sibling());
    }
    out
}

/// Splits a binary proof into elements of `width`-byte siblings.
///
/// `None` if the length is not a whole number of chunks or a direction byte is unknown.
pub fn from_binary(proof: &[u8], width: usize) -> Option<Vec<ProofElement>> {
    let chunk = width + 1;
    if proof.len() % chunk != 0 {
        return None;
    }
    proof
        .chunks_exact(chunk)
        .map(|c| {
            let sibling = c[1..].to_vec();
            match c[0] {
                DIRECTION_LEFT => Some(ProofElement::Left(sibling)),
                DIRECTION_RIGHT => Some(ProofElement::Right(sibling)),
                _ => None,
            }
        })
        .collect()
}
