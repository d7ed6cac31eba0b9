pub mod permutation;
pub mod rand;
