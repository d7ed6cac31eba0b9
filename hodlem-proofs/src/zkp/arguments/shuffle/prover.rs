use super::proof::Proof;
use super::{seed_of, Seed};
use crate::error::CryptoError;
use crate::utils::permutation::Permutation;
use crate::utils::rand::sample_vector;

use ark_ec::CurveGroup;
use ark_std::marker::PhantomData;
use ark_std::ops::Mul;
use ark_std::rand::Rng;

/// Round secrets kept by the prover between publishing the seed and answering
/// the challenge.
pub struct RoundSecrets<C: CurveGroup> {
    pub commitments: Vec<Vec<C::Affine>>,
    pub masks: Vec<C::ScalarField>,
    pub rows: Vec<Permutation>,
    pub seed: Seed,
}

pub struct Prover<C>
where
    C: CurveGroup,
{
    phantom: PhantomData<C>,
}

fn scale<C: CurveGroup>(points: &[C::Affine], scalar: C::ScalarField) -> Vec<C::Affine> {
    let projective: Vec<C> = points.iter().map(|p| p.mul(scalar)).collect();
    C::normalize_batch(&projective)
}

impl<C> Prover<C>
where
    C: CurveGroup,
{
    /// `shuffled[i] = previous[permutation(i)]·key`
    pub fn shuffle(
        previous: &[C::Affine],
        permutation: &Permutation,
        key: C::ScalarField,
    ) -> Result<Vec<C::Affine>, CryptoError> {
        Ok(scale::<C>(&permutation.permute_array(previous)?, key))
    }

    pub fn commit<R: Rng>(
        rng: &mut R,
        shuffled: &[C::Affine],
        rounds: usize,
    ) -> Result<RoundSecrets<C>, CryptoError> {
        let masks: Vec<C::ScalarField> = sample_vector(rng, rounds);
        let rows: Vec<Permutation> = (0..rounds)
            .map(|_| Permutation::fixing_first(rng, shuffled.len()))
            .collect();
        let commitments = rows
            .iter()
            .zip(&masks)
            .map(|(row, mask)| Ok(scale::<C>(&row.permute_array(shuffled)?, *mask)))
            .collect::<Result<Vec<_>, CryptoError>>()?;
        let seed = seed_of::<C>(&commitments)?;

        Ok(RoundSecrets {
            commitments,
            masks,
            rows,
            seed,
        })
    }

    pub fn respond(
        secrets: &RoundSecrets<C>,
        bits: &[bool],
        permutation: &Permutation,
        key: C::ScalarField,
    ) -> Result<Proof<C>, CryptoError> {
        if bits.len() != secrets.rows.len() {
            return Err(CryptoError::LengthMismatch {
                expected: secrets.rows.len(),
                found: bits.len(),
            });
        }

        let mut responses = Vec::with_capacity(bits.len());
        let mut rows = Vec::with_capacity(bits.len());
        for ((bit, mask), row) in bits.iter().zip(&secrets.masks).zip(&secrets.rows) {
            let (response, opened) = if *bit {
                (*mask, row.clone())
            } else {
                (key * mask, permutation.compose(row)?)
            };
            responses.push(response);
            rows.push(opened.mapping.iter().map(|&i| i as u64).collect());
        }

        Ok(Proof::new(secrets.commitments.clone(), responses, rows))
    }
}
