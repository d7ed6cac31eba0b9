use super::{challenge, seed_of, Parameters, Seed};
use crate::error::CryptoError;
use crate::utils::permutation::Permutation;

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::ops::Mul;
use digest::Digest;

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<C: CurveGroup> {
    pub commitments: Vec<Vec<C::Affine>>,
    pub responses: Vec<C::ScalarField>,
    pub rows: Vec<Vec<u64>>,
}

fn failure() -> CryptoError {
    CryptoError::ProofVerificationError(String::from("Shuffle"))
}

impl<C: CurveGroup> Proof<C> {
    pub fn new(
        commitments: Vec<Vec<C::Affine>>,
        responses: Vec<C::ScalarField>,
        rows: Vec<Vec<u64>>,
    ) -> Self {
        Self {
            commitments,
            responses,
            rows,
        }
    }

    pub fn verify<D: Digest>(
        &self,
        parameters: &Parameters<C>,
        seed: &Seed,
    ) -> Result<(), CryptoError> {
        parameters.check_shape()?;
        let rounds = parameters.rounds;
        let size = parameters.shuffled.len();

        for found in [self.commitments.len(), self.responses.len(), self.rows.len()] {
            if found != rounds {
                return Err(CryptoError::LengthMismatch {
                    expected: rounds,
                    found,
                });
            }
        }

        if seed_of::<C>(&self.commitments)? != *seed {
            return Err(failure());
        }

        let bits = challenge::<C, D>(seed, parameters.shuffled, rounds);

        for (((commitment, response), row), bit) in self
            .commitments
            .iter()
            .zip(&self.responses)
            .zip(&self.rows)
            .zip(bits)
        {
            if commitment.len() != size || row.len() != size {
                return Err(CryptoError::LengthMismatch {
                    expected: size,
                    found: commitment.len().min(row.len()),
                });
            }
            let mapping = row
                .iter()
                .map(|&i| usize::try_from(i).map_err(|_| CryptoError::InvalidPermutation))
                .collect::<Result<Vec<_>, _>>()?;
            let row = Permutation::try_from(mapping)?;
            if size > 0 && !row.fixes(0) {
                return Err(CryptoError::InvalidPermutation);
            }
            if response.is_zero() {
                return Err(failure());
            }

            let source = if bit {
                parameters.shuffled
            } else {
                parameters.previous
            };

            let consistent = row
                .mapping
                .iter()
                .zip(commitment)
                .all(|(&j, opened)| source[j].mul(*response) == opened.into_group());
            if !consistent {
                return Err(failure());
            }
        }

        Ok(())
    }
}
