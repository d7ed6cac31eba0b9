//! Hex big-integer words, the numeric format exchanged with external provers.
//!
//! Every value travels as one `0x`-prefixed (prefix optional) big-endian hex
//! integer. A field element is one word, a short-Weierstrass point is two
//! (`x`, `y`), and the point at infinity is written `(0, 0)`.

use crate::error::CryptoError;

use ark_ec::models::short_weierstrass::{Affine, SWCurveConfig};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField, Zero};

fn strip_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Parse a single hex word into big-endian bytes.
pub fn decode_word(word: &str) -> Result<Vec<u8>, CryptoError> {
    let digits = word
        .trim()
        .strip_prefix("0x")
        .or_else(|| word.trim().strip_prefix("0X"))
        .unwrap_or_else(|| word.trim());
    if digits.is_empty() {
        return Err(CryptoError::MalformedWord(word.to_string()));
    }
    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    hex::decode(padded).map_err(|_| CryptoError::MalformedWord(word.to_string()))
}

pub fn decode_field<F: PrimeField>(word: &str) -> Result<F, CryptoError> {
    let bytes = decode_word(word)?;
    let value = F::from_be_bytes_mod_order(&bytes);
    if strip_zeros(&value.into_bigint().to_bytes_be()) != strip_zeros(&bytes) {
        return Err(CryptoError::NonCanonical);
    }
    Ok(value)
}

pub fn decode_index(word: &str) -> Result<usize, CryptoError> {
    let bytes = decode_word(word)?;
    let bytes = strip_zeros(&bytes);
    if bytes.len() > 8 {
        return Err(CryptoError::NonCanonical);
    }
    let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    usize::try_from(value).map_err(|_| CryptoError::NonCanonical)
}

pub fn decode_point<P>(x: &str, y: &str) -> Result<Affine<P>, CryptoError>
where
    P: SWCurveConfig,
    P::BaseField: PrimeField,
{
    let x: P::BaseField = decode_field(x)?;
    let y: P::BaseField = decode_field(y)?;
    if x.is_zero() && y.is_zero() {
        return Ok(Affine::identity());
    }
    let point = Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CryptoError::NotOnCurve);
    }
    Ok(point)
}

pub fn encode_field<F: PrimeField>(value: &F) -> String {
    let bytes = value.into_bigint().to_bytes_be();
    let digits = hex::encode(strip_zeros(&bytes));
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        String::from("0x0")
    } else {
        format!("0x{}", digits)
    }
}

pub fn encode_index(index: usize) -> String {
    format!("0x{:x}", index)
}

pub fn encode_point<P>(point: &Affine<P>) -> [String; 2]
where
    P: SWCurveConfig,
    P::BaseField: PrimeField,
{
    match point.xy() {
        Some((x, y)) => [encode_field(x), encode_field(y)],
        None => [String::from("0x0"), String::from("0x0")],
    }
}

/// Split prover output into words.
pub fn split_words(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// Sequential reader over a word stream.
pub struct WordReader<'a> {
    words: &'a [String],
    position: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(words: &'a [String]) -> Self {
        Self { words, position: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.words.len() - self.position
    }

    /// Fail unless exactly `blocks` blocks of `block_len` words remain.
    pub fn expect_blocks(&self, blocks: usize, block_len: usize) -> Result<(), CryptoError> {
        if self.remaining() != blocks * block_len {
            return Err(CryptoError::LengthMismatch {
                expected: blocks * block_len,
                found: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn next_word(&mut self) -> Result<&'a str, CryptoError> {
        let word = self.words.get(self.position).ok_or(CryptoError::LengthMismatch {
            expected: self.position + 1,
            found: self.words.len(),
        })?;
        self.position += 1;
        Ok(word.as_str())
    }

    pub fn next_index(&mut self) -> Result<usize, CryptoError> {
        decode_index(self.next_word()?)
    }

    pub fn next_field<F: PrimeField>(&mut self) -> Result<F, CryptoError> {
        decode_field(self.next_word()?)
    }

    pub fn next_point<P>(&mut self) -> Result<Affine<P>, CryptoError>
    where
        P: SWCurveConfig,
        P::BaseField: PrimeField,
    {
        let x = self.next_word()?;
        let y = self.next_word()?;
        decode_point(x, y)
    }
}
