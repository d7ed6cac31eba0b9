//! Fixed-size word blocks exchanged with external provers.
//!
//! | block          | words | layout                                   |
//! |----------------|-------|------------------------------------------|
//! | card           | 2     | `x, y`                                   |
//! | prep row       | 13    | `g, h, gx, hx, a, b` as point pairs, `r` |
//! | decrypt share  | 8     | `index, x, y, a.x, a.y, b.x, b.y, r`     |
//! | reveal         | 7     | `index, value, a.x, a.y, b.x, b.y, r`    |
//! | shuffle row    | 53    | one slot index per word                  |

use super::{DecryptShare, DleqProof, Point, PrepRow, RevealProof, Scalar, ShuffleProof};
use crate::cards::DECK_SIZE;
use crate::error::{HodlemError, Result};

use ark_bn254::g1::Config;
use hodlem_proofs::error::CryptoError;
use hodlem_proofs::wire::{decode_word, encode_field, encode_index, encode_point, WordReader};
use hodlem_proofs::zkp::arguments::shuffle::Seed;

pub const CARD_WORDS: usize = 2;
pub const PREP_ROW_WORDS: usize = 13;
pub const DECRYPT_WORDS: usize = 8;
pub const REVEAL_WORDS: usize = 7;

fn read_proof(reader: &mut WordReader) -> Result<DleqProof> {
    let a: Point = reader.next_point::<Config>()?;
    let b: Point = reader.next_point::<Config>()?;
    let r: Scalar = reader.next_field()?;
    Ok(DleqProof::new(a, b, r))
}

fn write_proof(proof: &DleqProof, out: &mut Vec<String>) {
    out.extend(encode_point(proof.a()));
    out.extend(encode_point(proof.b()));
    out.push(encode_field(proof.r()));
}

fn blocks(words: &[String], block_len: usize) -> Result<usize> {
    if words.len() % block_len != 0 {
        return Err(CryptoError::LengthMismatch {
            expected: words.len() / block_len * block_len + block_len,
            found: words.len(),
        }
        .into());
    }
    Ok(words.len() / block_len)
}

pub fn decode_deck(words: &[String]) -> Result<Vec<Point>> {
    let mut reader = WordReader::new(words);
    reader.expect_blocks(DECK_SIZE, CARD_WORDS)?;
    (0..DECK_SIZE)
        .map(|_| Ok(reader.next_point::<Config>()?))
        .collect()
}

pub fn encode_deck(deck: &[Point]) -> Vec<String> {
    deck.iter().flat_map(encode_point).collect()
}

pub fn decode_prep_rows(words: &[String]) -> Result<Vec<PrepRow>> {
    let mut reader = WordReader::new(words);
    reader.expect_blocks(DECK_SIZE, PREP_ROW_WORDS)?;
    (0..DECK_SIZE)
        .map(|_| {
            Ok(PrepRow {
                g: reader.next_point::<Config>()?,
                h: reader.next_point::<Config>()?,
                gx: reader.next_point::<Config>()?,
                hx: reader.next_point::<Config>()?,
                proof: read_proof(&mut reader)?,
            })
        })
        .collect()
}

pub fn encode_prep_rows(rows: &[PrepRow]) -> Vec<String> {
    let mut out = Vec::with_capacity(rows.len() * PREP_ROW_WORDS);
    for row in rows {
        for point in [&row.g, &row.h, &row.gx, &row.hx] {
            out.extend(encode_point(point));
        }
        write_proof(&row.proof, &mut out);
    }
    out
}

pub fn decode_decrypt_shares(words: &[String]) -> Result<Vec<DecryptShare>> {
    let count = blocks(words, DECRYPT_WORDS)?;
    let mut reader = WordReader::new(words);
    (0..count)
        .map(|_| {
            Ok(DecryptShare {
                index: reader.next_index()?,
                share: reader.next_point::<Config>()?,
                proof: read_proof(&mut reader)?,
            })
        })
        .collect()
}

pub fn encode_decrypt_shares(shares: &[DecryptShare]) -> Vec<String> {
    let mut out = Vec::with_capacity(shares.len() * DECRYPT_WORDS);
    for share in shares {
        out.push(encode_index(share.index));
        out.extend(encode_point(&share.share));
        write_proof(&share.proof, &mut out);
    }
    out
}

pub fn decode_reveals(words: &[String]) -> Result<Vec<RevealProof>> {
    let count = blocks(words, REVEAL_WORDS)?;
    let mut reader = WordReader::new(words);
    (0..count)
        .map(|_| {
            let index = reader.next_index()?;
            let value = u8::try_from(reader.next_index()?)
                .map_err(|_| HodlemError::InvalidProof)?;
            Ok(RevealProof {
                index,
                value,
                proof: read_proof(&mut reader)?,
            })
        })
        .collect()
}

pub fn encode_reveals(reveals: &[RevealProof]) -> Vec<String> {
    let mut out = Vec::with_capacity(reveals.len() * REVEAL_WORDS);
    for reveal in reveals {
        out.push(encode_index(reveal.index));
        out.push(encode_index(usize::from(reveal.value)));
        write_proof(&reveal.proof, &mut out);
    }
    out
}

/// A 32-byte seed or commitment hash.
pub fn decode_seed(word: &str) -> Result<Seed> {
    let bytes = decode_word(word)?;
    if bytes.len() > 32 {
        return Err(CryptoError::LengthMismatch {
            expected: 32,
            found: bytes.len(),
        }
        .into());
    }
    let mut seed = [0u8; 32];
    seed[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(seed)
}

pub fn encode_seed(seed: &Seed) -> String {
    format!("0x{}", hex::encode(seed))
}

/// Shuffle proof as three word streams: `rounds` commitment decks, `rounds`
/// response scalars and `rounds` rows of slot indices.
pub fn decode_shuffle_proof(
    commitments: &[String],
    responses: &[String],
    rows: &[String],
    rounds: usize,
) -> Result<ShuffleProof> {
    let mut reader = WordReader::new(commitments);
    reader.expect_blocks(rounds * DECK_SIZE, CARD_WORDS)?;
    let commitments = (0..rounds)
        .map(|_| {
            (0..DECK_SIZE)
                .map(|_| reader.next_point::<Config>())
                .collect::<std::result::Result<Vec<Point>, _>>()
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut reader = WordReader::new(responses);
    reader.expect_blocks(rounds, 1)?;
    let responses = (0..rounds)
        .map(|_| reader.next_field::<Scalar>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut reader = WordReader::new(rows);
    reader.expect_blocks(rounds, DECK_SIZE)?;
    let rows = (0..rounds)
        .map(|_| {
            (0..DECK_SIZE)
                .map(|_| reader.next_index().map(|i| i as u64))
                .collect::<std::result::Result<Vec<u64>, _>>()
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ShuffleProof::new(commitments, responses, rows))
}

pub fn encode_shuffle_proof(proof: &ShuffleProof) -> [Vec<String>; 3] {
    let commitments = proof
        .commitments
        .iter()
        .flat_map(|deck| encode_deck(deck))
        .collect();
    let responses = proof.responses.iter().map(encode_field).collect();
    let rows = proof
        .rows
        .iter()
        .flatten()
        .map(|&i| format!("0x{:x}", i))
        .collect();
    [commitments, responses, rows]
}
