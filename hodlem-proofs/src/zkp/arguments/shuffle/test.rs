#[cfg(test)]
mod test {
    use crate::error::CryptoError;
    use crate::utils::permutation::Permutation;
    use crate::zkp::arguments::shuffle::prover::Prover;
    use crate::zkp::arguments::shuffle::{challenge, Parameters};
    use ark_ec::CurveGroup;
    use ark_std::{rand::thread_rng, UniformRand};
    use blake2::Blake2s256;

    type AffinePoint = ark_bn254::G1Affine;
    type Curve = ark_bn254::G1Projective;
    type Scalar = ark_bn254::Fr;

    const ROUNDS: usize = 32;

    fn deck(size: usize) -> Vec<AffinePoint> {
        let rng = &mut thread_rng();
        (0..size).map(|_| Curve::rand(rng).into_affine()).collect()
    }

    #[test]
    fn honest_shuffle_verifies() {
        let rng = &mut thread_rng();
        let previous = deck(53);
        let permutation = Permutation::fixing_first(rng, 53);
        let key = Scalar::rand(rng);

        let shuffled = Prover::<Curve>::shuffle(&previous, &permutation, key).unwrap();
        let secrets = Prover::<Curve>::commit(rng, &shuffled, ROUNDS).unwrap();
        let bits = challenge::<Curve, Blake2s256>(&secrets.seed, &shuffled, ROUNDS);
        let proof = Prover::<Curve>::respond(&secrets, &bits, &permutation, key).unwrap();

        let parameters = Parameters::<Curve>::new(&previous, &shuffled, ROUNDS);
        assert_eq!(proof.verify::<Blake2s256>(&parameters, &secrets.seed), Ok(()));
    }

    #[test]
    fn substituted_card_is_caught() {
        let rng = &mut thread_rng();
        let previous = deck(53);
        let permutation = Permutation::fixing_first(rng, 53);
        let key = Scalar::rand(rng);

        let mut shuffled = Prover::<Curve>::shuffle(&previous, &permutation, key).unwrap();
        shuffled[7] = Curve::rand(rng).into_affine();

        let secrets = Prover::<Curve>::commit(rng, &shuffled, ROUNDS).unwrap();
        let bits = challenge::<Curve, Blake2s256>(&secrets.seed, &shuffled, ROUNDS);
        let proof = Prover::<Curve>::respond(&secrets, &bits, &permutation, key).unwrap();

        let parameters = Parameters::<Curve>::new(&previous, &shuffled, ROUNDS);
        assert_eq!(
            proof.verify::<Blake2s256>(&parameters, &secrets.seed),
            Err(CryptoError::ProofVerificationError(String::from("Shuffle")))
        );
    }

    #[test]
    fn seed_must_match_commitments() {
        let rng = &mut thread_rng();
        let previous = deck(53);
        let permutation = Permutation::fixing_first(rng, 53);
        let key = Scalar::rand(rng);

        let shuffled = Prover::<Curve>::shuffle(&previous, &permutation, key).unwrap();
        let secrets = Prover::<Curve>::commit(rng, &shuffled, ROUNDS).unwrap();
        let bits = challenge::<Curve, Blake2s256>(&secrets.seed, &shuffled, ROUNDS);
        let proof = Prover::<Curve>::respond(&secrets, &bits, &permutation, key).unwrap();

        let parameters = Parameters::<Curve>::new(&previous, &shuffled, ROUNDS);
        let mut other_seed = secrets.seed;
        other_seed[0] ^= 1;
        assert_eq!(
            proof.verify::<Blake2s256>(&parameters, &other_seed),
            Err(CryptoError::ProofVerificationError(String::from("Shuffle")))
        );
    }

    #[test]
    fn rows_must_fix_the_generator_slot() {
        let rng = &mut thread_rng();
        let previous = deck(53);
        let permutation = Permutation::fixing_first(rng, 53);
        let key = Scalar::rand(rng);

        let shuffled = Prover::<Curve>::shuffle(&previous, &permutation, key).unwrap();
        let secrets = Prover::<Curve>::commit(rng, &shuffled, 1).unwrap();
        let bits = challenge::<Curve, Blake2s256>(&secrets.seed, &shuffled, 1);
        let mut proof = Prover::<Curve>::respond(&secrets, &bits, &permutation, key).unwrap();
        proof.rows[0].swap(0, 1);

        let parameters = Parameters::<Curve>::new(&previous, &shuffled, 1);
        assert_eq!(
            proof.verify::<Blake2s256>(&parameters, &secrets.seed),
            Err(CryptoError::InvalidPermutation)
        );
    }
}
