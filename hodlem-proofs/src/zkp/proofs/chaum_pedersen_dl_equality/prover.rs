use crate::error::CryptoError;

use super::proof::{challenge, Proof};
use super::{Parameters, Statement, Witness};

use crate::utils::rand::FiatShamirRng;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_std::marker::PhantomData;
use ark_std::{rand::Rng, UniformRand};
use digest::Digest;

pub struct Prover<C>
where
    C: CurveGroup,
{
    phantom: PhantomData<C>,
}

impl<C> Prover<C>
where
    C: CurveGroup,
{
    pub fn create_proof<R: Rng, D: Digest>(
        rng: &mut R,
        parameters: &Parameters<C>,
        statement: &Statement<C>,
        witness: &Witness<C>,
        fs_rng: &mut FiatShamirRng<D>,
    ) -> Result<Proof<C>, CryptoError> {
        let omega = C::ScalarField::rand(rng);
        let nonce = omega.into_bigint();
        let a = parameters.g.mul_bigint(nonce).into_affine();
        let b = parameters.h.mul_bigint(nonce).into_affine();

        let c = challenge(fs_rng, parameters, statement, &a, &b);

        Ok(Proof {
            a,
            b,
            r: omega + c * *witness,
        })
    }
}
