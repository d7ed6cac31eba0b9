use crate::error::CryptoError;

use ark_std::rand::seq::SliceRandom;
use ark_std::rand::Rng;

/// A permutation of `0..size`, read as `output[i] = input[mapping[i]]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    pub mapping: Vec<usize>,
    pub size: usize,
}

impl Permutation {
    pub fn new<R: Rng>(rng: &mut R, size: usize) -> Self {
        let mut mapping: Vec<usize> = (0..size).collect();
        mapping.shuffle(rng);
        Self { mapping, size }
    }

    /// A random permutation that keeps index 0 in place.
    pub fn fixing_first<R: Rng>(rng: &mut R, size: usize) -> Self {
        let mut mapping: Vec<usize> = (0..size).collect();
        if size > 1 {
            mapping[1..].shuffle(rng);
        }
        Self { mapping, size }
    }

    pub fn identity(size: usize) -> Self {
        Self {
            mapping: (0..size).collect(),
            size,
        }
    }

    pub fn permute_array<T: Clone>(&self, input: &[T]) -> Result<Vec<T>, CryptoError> {
        if input.len() != self.size {
            return Err(CryptoError::LengthMismatch {
                expected: self.size,
                found: input.len(),
            });
        }
        Ok(self.mapping.iter().map(|&i| input[i].clone()).collect())
    }

    /// `self.compose(other)` applies `other` first: the result maps `i` to
    /// `self.mapping[other.mapping[i]]`.
    pub fn compose(&self, other: &Permutation) -> Result<Permutation, CryptoError> {
        if self.size != other.size {
            return Err(CryptoError::LengthMismatch {
                expected: self.size,
                found: other.size,
            });
        }
        Ok(Permutation {
            mapping: other.mapping.iter().map(|&i| self.mapping[i]).collect(),
            size: self.size,
        })
    }

    pub fn fixes(&self, index: usize) -> bool {
        self.mapping.get(index) == Some(&index)
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = CryptoError;

    fn try_from(mapping: Vec<usize>) -> Result<Self, Self::Error> {
        let size = mapping.len();
        let mut seen = vec![false; size];
        for &i in &mapping {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(CryptoError::InvalidPermutation),
            }
        }
        Ok(Self { mapping, size })
    }
}

#[cfg(test)]
mod test {
    use super::Permutation;
    use crate::error::CryptoError;
    use ark_std::rand::thread_rng;

    #[test]
    fn rejects_repeated_index() {
        assert_eq!(
            Permutation::try_from(vec![0, 2, 2]),
            Err(CryptoError::InvalidPermutation)
        );
        assert_eq!(
            Permutation::try_from(vec![0, 3, 1]),
            Err(CryptoError::InvalidPermutation)
        );
    }

    #[test]
    fn composition_applies_right_first() {
        let rng = &mut thread_rng();
        let pi = Permutation::fixing_first(rng, 53);
        let sigma = Permutation::new(rng, 53);
        let deck: Vec<usize> = (100..153).collect();

        let two_steps = sigma
            .permute_array(&pi.permute_array(&deck).unwrap())
            .unwrap();
        let one_step = pi.compose(&sigma).unwrap().permute_array(&deck).unwrap();

        assert_eq!(two_steps, one_step);
        assert!(pi.fixes(0));
    }
}
