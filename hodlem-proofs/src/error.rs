use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CryptoError {
    #[error("{0} proof verification failed")]
    ProofVerificationError(String),

    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("not a permutation")]
    InvalidPermutation,

    #[error("malformed hex word `{0}`")]
    MalformedWord(String),

    #[error("value is not a canonical field element")]
    NonCanonical,

    #[error("point is not on the curve or not in the prime-order subgroup")]
    NotOnCurve,

    #[error("serialization failed")]
    Serialization,
}
