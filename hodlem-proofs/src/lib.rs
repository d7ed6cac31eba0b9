//! Zero-knowledge building blocks for dealerless card games.
//!
//! Everything here is generic over an arkworks [`ark_ec::CurveGroup`]; the
//! game engine instantiates it on BN254.

pub mod commitment;
pub mod error;
pub mod utils;
pub mod wire;
pub mod zkp;
