//! Hash commitments for commit-then-reveal submissions.

use crate::error::CryptoError;

use ark_serialize::CanonicalSerialize;
use blake2::{Blake2s256, Digest};

pub type Commitment = [u8; 32];

fn to_commitment(digest: &[u8]) -> Commitment {
    let mut out = [0u8; 32];
    out.copy_from_slice(digest);
    out
}

pub fn commit_bytes(bytes: &[u8]) -> Commitment {
    to_commitment(&Blake2s256::digest(bytes))
}

/// Commit to a sequence of values through their compressed encodings.
pub fn commit_all<T: CanonicalSerialize>(items: &[T]) -> Result<Commitment, CryptoError> {
    let mut hasher = Blake2s256::new();
    let mut buf = Vec::new();
    for item in items {
        buf.clear();
        item.serialize_compressed(&mut buf)
            .map_err(|_| CryptoError::Serialization)?;
        hasher.update(&buf);
    }
    Ok(to_commitment(&hasher.finalize()))
}

#[cfg(test)]
mod test {
    use super::commit_all;
    use ark_ec::CurveGroup;
    use ark_std::{rand::thread_rng, UniformRand};

    type Curve = ark_bn254::G1Projective;

    #[test]
    fn order_matters() {
        let rng = &mut thread_rng();
        let a = Curve::rand(rng).into_affine();
        let b = Curve::rand(rng).into_affine();
        assert_ne!(commit_all(&[a, b]).unwrap(), commit_all(&[b, a]).unwrap());
        assert_eq!(commit_all(&[a, b]).unwrap(), commit_all(&[a, b]).unwrap());
    }
}
