//! Chaum–Pedersen proof that `log_g(gx) == log_h(hx)`.

pub mod proof;
pub mod prover;

use crate::error::CryptoError;
use crate::utils::rand::FiatShamirRng;
use crate::zkp::ArgumentOfKnowledge;

use ark_ec::CurveGroup;
use ark_std::marker::PhantomData;
use ark_std::rand::Rng;
use digest::Digest;

pub struct DLEquality<'a, C: CurveGroup> {
    _group: PhantomData<&'a C>,
}

#[derive(Copy, Clone)]
pub struct Parameters<'a, C: CurveGroup> {
    pub g: &'a C::Affine,
    pub h: &'a C::Affine,
}

impl<'a, C: CurveGroup> Parameters<'a, C> {
    pub fn new(g: &'a C::Affine, h: &'a C::Affine) -> Self {
        Self { g, h }
    }
}

/// `(gx, hx)`
#[derive(Copy, Clone)]
pub struct Statement<'a, C: CurveGroup>(pub &'a C::Affine, pub &'a C::Affine);

impl<'a, C: CurveGroup> Statement<'a, C> {
    pub fn new(gx: &'a C::Affine, hx: &'a C::Affine) -> Self {
        Self(gx, hx)
    }
}

pub type Witness<C> = <C as ark_ec::Group>::ScalarField;

impl<'a, C: CurveGroup> ArgumentOfKnowledge for DLEquality<'a, C> {
    type CommonReferenceString = Parameters<'a, C>;
    type Statement = Statement<'a, C>;
    type Witness = Witness<C>;
    type Proof = proof::Proof<C>;

    fn prove<R: Rng, D: Digest>(
        rng: &mut R,
        common_reference_string: &Self::CommonReferenceString,
        statement: &Self::Statement,
        witness: &Self::Witness,
        fs_rng: &mut FiatShamirRng<D>,
    ) -> Result<Self::Proof, CryptoError> {
        prover::Prover::create_proof(rng, common_reference_string, statement, witness, fs_rng)
    }

    fn verify<D: Digest>(
        common_reference_string: &Self::CommonReferenceString,
        statement: &Self::Statement,
        proof: &Self::Proof,
        fs_rng: &mut FiatShamirRng<D>,
    ) -> Result<(), CryptoError> {
        proof.verify(common_reference_string, statement, fs_rng)
    }
}
