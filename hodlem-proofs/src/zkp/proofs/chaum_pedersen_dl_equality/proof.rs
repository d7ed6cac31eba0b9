use crate::error::CryptoError;
use ark_std::ops::Mul;

use super::{Parameters, Statement};

use crate::utils::rand::FiatShamirRng;
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use digest::Digest;

/// Proof `(g·s, h·s, s + c·x)` for the statement `gx = g·x, hx = h·x`.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Debug, CanonicalDeserialize, CanonicalSerialize)]
pub struct Proof<C>
where
    C: CurveGroup,
{
    pub(crate) a: C::Affine,
    pub(crate) b: C::Affine,
    pub(crate) r: C::ScalarField,
}

/// Challenge scalar bound to the whole transcript, shared by prover and verifier.
pub(crate) fn challenge<C: CurveGroup, D: Digest>(
    fs_rng: &mut FiatShamirRng<D>,
    parameters: &Parameters<C>,
    statement: &Statement<C>,
    a: &C::Affine,
    b: &C::Affine,
) -> C::ScalarField {
    fs_rng.absorb_bytes(b"chaum_pedersen");
    fs_rng.absorb(parameters.g);
    fs_rng.absorb(parameters.h);
    fs_rng.absorb(statement.0);
    fs_rng.absorb(statement.1);
    fs_rng.absorb(a);
    fs_rng.absorb(b);
    C::ScalarField::rand(fs_rng)
}

fn failure() -> CryptoError {
    CryptoError::ProofVerificationError(String::from("Chaum-Pedersen"))
}

impl<C: CurveGroup> Proof<C> {
    /// Assemble a proof received from an external prover.
    pub fn new(a: C::Affine, b: C::Affine, r: C::ScalarField) -> Self {
        Self { a, b, r }
    }

    pub fn a(&self) -> &C::Affine {
        &self.a
    }

    pub fn b(&self) -> &C::Affine {
        &self.b
    }

    pub fn r(&self) -> &C::ScalarField {
        &self.r
    }

    pub fn verify<D: Digest>(
        &self,
        parameters: &Parameters<C>,
        statement: &Statement<C>,
        fs_rng: &mut FiatShamirRng<D>,
    ) -> Result<(), CryptoError> {
        // a degenerate base proves nothing about the exponent
        if parameters.g.is_zero() || parameters.h.is_zero() {
            return Err(failure());
        }

        let c = challenge(fs_rng, parameters, statement, &self.a, &self.b);

        // g * r ==? a + gx*c
        if parameters.g.mul(self.r) != self.a.into_group() + statement.0.mul(c) {
            return Err(failure());
        }

        // h * r ==? b + hx*c
        if parameters.h.mul(self.r) != self.b.into_group() + statement.1.mul(c) {
            return Err(failure());
        }

        Ok(())
    }
}
