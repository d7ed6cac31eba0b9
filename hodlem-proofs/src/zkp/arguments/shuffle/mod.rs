//! Cut-and-choose argument that one deck is a permuted re-encryption of another.
//!
//! The prover publishes `shuffled[i] = previous[π(i)]·x` with `π(0) = 0`.
//! For each of `k` rounds it commits to `commitment[i] = shuffled[σ(i)]·s`
//! for a fresh `σ` (fixing 0) and mask `s`, and publishes the hash of all
//! commitments as the seed. One challenge bit per round is derived from the
//! seed and the shuffled deck. On a set bit the prover opens `(s, σ)` against
//! `shuffled`; on a clear bit it opens `(x·s, π∘σ)` against `previous`.
//! A cheating prover survives each round with probability 1/2.

pub mod proof;
pub mod prover;
mod test;

use crate::commitment::{commit_all, Commitment};
use crate::error::CryptoError;
use crate::utils::rand::FiatShamirRng;

use ark_ec::CurveGroup;
use digest::Digest;

pub const MAX_ROUNDS: usize = 64;

pub type Seed = Commitment;

pub struct Parameters<'a, C: CurveGroup> {
    pub previous: &'a [C::Affine],
    pub shuffled: &'a [C::Affine],
    pub rounds: usize,
}

impl<'a, C: CurveGroup> Parameters<'a, C> {
    pub fn new(previous: &'a [C::Affine], shuffled: &'a [C::Affine], rounds: usize) -> Self {
        Self {
            previous,
            shuffled,
            rounds,
        }
    }

    pub(crate) fn check_shape(&self) -> Result<(), CryptoError> {
        if self.rounds == 0 || self.rounds > MAX_ROUNDS {
            return Err(CryptoError::LengthMismatch {
                expected: MAX_ROUNDS,
                found: self.rounds,
            });
        }
        if self.previous.len() != self.shuffled.len() {
            return Err(CryptoError::LengthMismatch {
                expected: self.previous.len(),
                found: self.shuffled.len(),
            });
        }
        Ok(())
    }
}

/// Seed binding every round's commitment deck.
pub fn seed_of<C: CurveGroup>(commitments: &[Vec<C::Affine>]) -> Result<Seed, CryptoError> {
    let flat: Vec<C::Affine> = commitments.iter().flatten().copied().collect();
    commit_all(&flat)
}

/// One bit per round, derived from the committed seed and the shuffled deck.
pub fn challenge<C: CurveGroup, D: Digest>(
    seed: &Seed,
    shuffled: &[C::Affine],
    rounds: usize,
) -> Vec<bool> {
    let mut fs_rng = FiatShamirRng::<D>::from_seed(b"reshuffle");
    fs_rng.absorb_bytes(seed);
    fs_rng.absorb_all(shuffled);
    fs_rng.challenge_bits(rounds)
}
