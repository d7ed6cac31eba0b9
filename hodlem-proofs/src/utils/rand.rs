use ark_serialize::CanonicalSerialize;
use ark_std::marker::PhantomData;
use ark_std::rand::{Rng, RngCore, SeedableRng};
use ark_std::UniformRand;
use digest::generic_array::GenericArray;
use digest::Digest;
use rand_chacha::ChaChaRng;

/// Sample a vector of random elements of type T
pub fn sample_vector<T: UniformRand, R: Rng>(seed: &mut R, length: usize) -> Vec<T> {
    (0..length).map(|_| T::rand(seed)).collect()
}

/// A transcript-driven RNG: every absorbed message is hashed into the running
/// seed, and challenges are drawn from a ChaCha stream keyed by that seed.
pub struct FiatShamirRng<D: Digest> {
    r: ChaChaRng,
    seed: GenericArray<u8, D::OutputSize>,
    #[doc(hidden)]
    digest: PhantomData<D>,
}

impl<D: Digest> RngCore for FiatShamirRng<D> {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.r.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.r.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.r.fill_bytes(dest);
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), ark_std::rand::Error> {
        self.r.fill_bytes(dest);
        Ok(())
    }
}

fn chacha_from<D: Digest>(seed: &GenericArray<u8, D::OutputSize>) -> ChaChaRng {
    let mut key = [0u8; 32];
    key.iter_mut().zip(seed.iter()).for_each(|(k, s)| *k = *s);
    ChaChaRng::from_seed(key)
}

impl<D: Digest> FiatShamirRng<D> {
    /// Create a new `Self` by initializing with a fresh seed.
    /// `self.seed = H(seed)`.
    #[inline]
    pub fn from_seed(seed: &[u8]) -> Self {
        let seed = D::digest(seed);
        let r = chacha_from::<D>(&seed);
        Self {
            r,
            seed,
            digest: PhantomData,
        }
    }

    /// Refresh `self.seed` with raw bytes:
    /// `self.seed = H(bytes || self.seed)`.
    #[inline]
    pub fn absorb_bytes(&mut self, bytes: &[u8]) {
        let mut hasher = D::new();
        hasher.update(bytes);
        hasher.update(&self.seed);
        self.seed = hasher.finalize();
        self.r = chacha_from::<D>(&self.seed);
    }

    /// Refresh `self.seed` with the compressed encoding of `item`.
    #[inline]
    pub fn absorb<T: CanonicalSerialize + ?Sized>(&mut self, item: &T) {
        let mut bytes = Vec::with_capacity(item.compressed_size());
        item.serialize_compressed(&mut bytes)
            .expect("writing to a Vec cannot fail");
        self.absorb_bytes(&bytes);
    }

    /// Absorb every element of `items` in order.
    pub fn absorb_all<T: CanonicalSerialize>(&mut self, items: &[T]) {
        let mut bytes = Vec::new();
        for item in items {
            item.serialize_compressed(&mut bytes)
                .expect("writing to a Vec cannot fail");
        }
        self.absorb_bytes(&bytes);
    }

    /// Draw `count` uniformly random challenge bits.
    pub fn challenge_bits(&mut self, count: usize) -> Vec<bool> {
        (0..count).map(|_| self.r.next_u32() & 1 == 1).collect()
    }
}

#[cfg(test)]
mod test {
    use super::FiatShamirRng;
    use ark_std::UniformRand;
    use blake2::Blake2s256;

    type FS = FiatShamirRng<Blake2s256>;
    type Scalar = ark_bn254::Fr;

    #[test]
    fn same_transcript_same_challenge() {
        let mut left = FS::from_seed(b"table 7");
        let mut right = FS::from_seed(b"table 7");
        left.absorb(&Scalar::from(42u64));
        right.absorb(&Scalar::from(42u64));
        assert_eq!(Scalar::rand(&mut left), Scalar::rand(&mut right));
    }

    #[test]
    fn different_transcript_different_challenge() {
        let mut left = FS::from_seed(b"table 7");
        let mut right = FS::from_seed(b"table 7");
        left.absorb_bytes(b"seat 0");
        right.absorb_bytes(b"seat 1");
        assert_ne!(left.challenge_bits(64), right.challenge_bits(64));
    }
}
