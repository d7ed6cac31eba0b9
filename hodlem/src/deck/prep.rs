//! Key setup: a two-step commit-reveal over 53 per-slot key proofs.

use super::{transcript, Curve, DeckInstance, DleqProof, Point};
use crate::cards::DECK_SIZE;
use crate::error::{HodlemError, Result};
use crate::types::{DeckId, SeatIndex};

use ark_ec::CurveGroup;
use hodlem_proofs::commitment::{commit_all, Commitment};
use hodlem_proofs::error::CryptoError;
use hodlem_proofs::zkp::proofs::chaum_pedersen_dl_equality::{Parameters, Statement};
use tracing::{debug, info, warn};

pub const PREP_LABEL: &[u8] = b"hodlem/prep";

/// One slot of a seat's key setup: `gx = g·x` and `hx = h·x` for the seat's
/// key `x` of that slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepRow {
    pub g: Point,
    pub h: Point,
    pub gx: Point,
    pub hx: Point,
    pub proof: DleqProof,
}

/// Commitment sent before the rows: the hash of every slot's `(g, gx, h)`.
/// `hx` is pinned by the proof, so it need not be committed.
pub fn prep_commitment(rows: &[PrepRow]) -> Result<Commitment> {
    let points: Vec<Point> = rows.iter().flat_map(|r| [r.g, r.gx, r.h]).collect();
    Ok(commit_all(&points)?)
}

/// Check all 53 key proofs of `seat` on `deck`.
pub fn verify_prep_rows(
    deck: DeckId,
    seat: SeatIndex,
    rows: &[PrepRow],
) -> std::result::Result<(), CryptoError> {
    if rows.len() != DECK_SIZE {
        return Err(CryptoError::LengthMismatch {
            expected: DECK_SIZE,
            found: rows.len(),
        });
    }
    for (slot, row) in rows.iter().enumerate() {
        let parameters = Parameters::<Curve>::new(&row.g, &row.h);
        let statement = Statement::<Curve>::new(&row.gx, &row.hx);
        let mut fs_rng = transcript(PREP_LABEL, deck, seat, slot);
        row.proof.verify(&parameters, &statement, &mut fs_rng)?;
    }
    Ok(())
}

impl DeckInstance {
    pub fn prep_committed(&self, seat: SeatIndex) -> bool {
        matches!(self.commits.get(seat), Some(Some(_)))
    }

    pub fn prep_revealed(&self, seat: SeatIndex) -> bool {
        matches!(self.keys.get(seat), Some(Some(_)))
    }

    pub fn all_committed(&self) -> bool {
        self.commits.iter().all(Option::is_some)
    }

    pub fn submit_prep(&mut self, seat: SeatIndex, commitment: Commitment) -> Result<()> {
        self.check_seat(seat)?;
        if self.prep_committed(seat) {
            return Err(HodlemError::AlreadySubmitted);
        }
        self.commits[seat] = Some(commitment);
        debug!(deck = self.id, seat, "prep committed");
        Ok(())
    }

    /// Open a prep commitment. Returns true once every seat has opened and
    /// the base deck is fixed.
    pub fn verify_prep(&mut self, seat: SeatIndex, rows: &[PrepRow]) -> Result<bool> {
        self.check_seat(seat)?;
        let committed = self.commits[seat].ok_or(HodlemError::NotSubmitted)?;
        if self.prep_revealed(seat) {
            return Err(HodlemError::AlreadySubmitted);
        }
        if rows.len() != DECK_SIZE {
            return Err(HodlemError::InvalidProof);
        }
        if prep_commitment(rows)? != committed {
            return Err(HodlemError::WrongCommit);
        }
        verify_prep_rows(self.id, seat, rows).map_err(|e| {
            warn!(deck = self.id, seat, error = %e, "prep proof rejected");
            HodlemError::InvalidProof
        })?;

        self.keys[seat] = Some(rows.iter().map(|r| r.hx).collect());
        debug!(deck = self.id, seat, "prep verified");

        if self.keys.iter().all(Option::is_some) {
            let mut sums = vec![Curve::default(); DECK_SIZE];
            for keys in self.keys.iter().flatten() {
                for (sum, hx) in sums.iter_mut().zip(keys) {
                    *sum += hx;
                }
            }
            self.base = Some(Curve::normalize_batch(&sums));
            info!(deck = self.id, "base deck established");
            return Ok(true);
        }
        Ok(false)
    }
}
