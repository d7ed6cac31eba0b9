//! Dealing: per-card decryption shares and holder reveals.

use super::{bit, transcript, Curve, DeckInstance, DleqProof, Point};
use crate::cards::{CARDS, DECK_SIZE};
use crate::error::{HodlemError, Result};
use crate::types::{DeckId, SeatIndex};

use hodlem_proofs::error::CryptoError;
use hodlem_proofs::zkp::proofs::chaum_pedersen_dl_equality::{Parameters, Statement};
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const DECRYPT_LABEL: &[u8] = b"hodlem/decrypt";
pub const REVEAL_LABEL: &[u8] = b"hodlem/reveal";

/// `share · x == current` for the submitting seat's shuffle key `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecryptShare {
    pub index: usize,
    pub share: Point,
    pub proof: DleqProof,
}

/// Holder's claim that `current == base[value] · x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealProof {
    pub index: usize,
    pub value: u8,
    pub proof: DleqProof,
}

/// Stage generators `(before, after)` of the seat shuffling at `position`.
pub struct Generators<'a> {
    pub before: &'a Point,
    pub after: &'a Point,
}

pub fn verify_decrypt_share(
    deck: DeckId,
    seat: SeatIndex,
    generators: &Generators,
    current: &Point,
    share: &DecryptShare,
) -> std::result::Result<(), CryptoError> {
    let parameters = Parameters::<Curve>::new(generators.before, &share.share);
    let statement = Statement::<Curve>::new(generators.after, current);
    let mut fs_rng = transcript(DECRYPT_LABEL, deck, seat, share.index);
    share.proof.verify(&parameters, &statement, &mut fs_rng)
}

pub fn verify_reveal(
    deck: DeckId,
    seat: SeatIndex,
    generators: &Generators,
    card: &Point,
    current: &Point,
    reveal: &RevealProof,
) -> std::result::Result<(), CryptoError> {
    let parameters = Parameters::<Curve>::new(generators.before, card);
    let statement = Statement::<Curve>::new(generators.after, current);
    let mut fs_rng = transcript(REVEAL_LABEL, deck, seat, reveal.index);
    reveal.proof.verify(&parameters, &statement, &mut fs_rng)
}

fn check_index(index: usize) -> Result<()> {
    if index == 0 || index >= DECK_SIZE {
        return Err(HodlemError::InvalidCardIndex(index));
    }
    Ok(())
}

impl DeckInstance {
    fn generators(&self, seat: SeatIndex) -> Result<Generators<'_>> {
        let hand = self.hand.as_ref().ok_or(HodlemError::WrongPhase)?;
        let position = hand.position(seat).ok_or(HodlemError::Unauthorised)?;
        match (
            hand.stage_generator(position),
            hand.stage_generator(position + 1),
        ) {
            (Some(before), Some(after)) => Ok(Generators { before, after }),
            _ => Err(HodlemError::WrongPhase),
        }
    }

    /// Mark `index` as dealt to `holder`, or to the board when `None`.
    pub fn assign(&mut self, index: usize, holder: Option<SeatIndex>) -> Result<()> {
        check_index(index)?;
        let hand = self.hand_mut()?;
        let slot = hand
            .slots
            .get_mut(index)
            .ok_or(HodlemError::WrongPhase)?;
        if slot.dealt {
            return Err(HodlemError::InvalidCardIndex(index));
        }
        slot.dealt = true;
        slot.holder = holder;
        Ok(())
    }

    /// Whether `seat` still owes a share for card `index`.
    pub fn owes_share(&self, seat: SeatIndex, index: usize) -> bool {
        let Some(hand) = self.hand.as_ref() else {
            return false;
        };
        let Some(slot) = hand.slots.get(index) else {
            return false;
        };
        hand.position(seat).is_some()
            && slot.dealt
            && slot.holder != Some(seat)
            && slot.decrypted & bit(seat) == 0
    }

    /// Every seat other than the holder has stripped its key from `index`.
    pub fn fully_decrypted(&self, index: usize) -> bool {
        let Some(hand) = self.hand.as_ref() else {
            return false;
        };
        let Some(slot) = hand.slots.get(index) else {
            return false;
        };
        let needed = hand.participants() & !slot.holder.map_or(0, bit);
        slot.dealt && slot.decrypted & needed == needed
    }

    pub fn opened(&self, index: usize) -> Option<u8> {
        self.hand
            .as_ref()
            .and_then(|h| h.slots.get(index))
            .and_then(|s| s.opened)
    }

    /// Apply a batch of decryption shares from `seat`. Community cards whose
    /// last share arrives are opened against the base deck and returned as
    /// `(index, value)`.
    pub fn decrypt_cards(
        &mut self,
        seat: SeatIndex,
        shares: &[DecryptShare],
    ) -> Result<Vec<(usize, u8)>> {
        let generators = self.generators(seat)?;
        let hand = self.hand.as_ref().ok_or(HodlemError::WrongPhase)?;

        let mut seen = BTreeSet::new();
        for share in shares {
            check_index(share.index)?;
            let slot = hand
                .slots
                .get(share.index)
                .filter(|s| s.dealt)
                .ok_or(HodlemError::InvalidCardIndex(share.index))?;
            if slot.holder == Some(seat) {
                return Err(HodlemError::Unauthorised);
            }
            if slot.decrypted & bit(seat) != 0 || !seen.insert(share.index) {
                return Err(HodlemError::AlreadySubmitted);
            }
            verify_decrypt_share(self.id, seat, &generators, &slot.current, share).map_err(
                |e| {
                    warn!(deck = self.id, seat, index = share.index, error = %e, "decryption share rejected");
                    HodlemError::InvalidProof
                },
            )?;
        }

        // community cards completed by this batch
        let participants = hand.participants();
        let mut opened = Vec::new();
        for share in shares {
            let slot = &hand.slots[share.index];
            let decrypted = slot.decrypted | bit(seat);
            if slot.holder.is_none() && decrypted & participants == participants {
                let value = self
                    .lookup(&share.share)
                    .ok_or(HodlemError::InvalidProof)?;
                opened.push((share.index, value));
            }
        }

        let id = self.id;
        let hand = self.hand_mut()?;
        for share in shares {
            let slot = &mut hand.slots[share.index];
            slot.current = share.share;
            slot.decrypted |= bit(seat);
        }
        for (index, value) in &opened {
            hand.slots[*index].opened = Some(*value);
        }
        debug!(deck = id, seat, shares = shares.len(), opened = opened.len(), "decrypted");
        Ok(opened)
    }

    /// Publicly open `seat`'s own cards.
    pub fn reveal_cards(&mut self, seat: SeatIndex, proofs: &[RevealProof]) -> Result<Vec<(usize, u8)>> {
        let generators = self.generators(seat)?;
        let hand = self.hand.as_ref().ok_or(HodlemError::WrongPhase)?;
        let base = self.base.as_ref().ok_or(HodlemError::WrongPhase)?;

        let mut seen = BTreeSet::new();
        for reveal in proofs {
            check_index(reveal.index)?;
            let slot = hand
                .slots
                .get(reveal.index)
                .filter(|s| s.dealt)
                .ok_or(HodlemError::InvalidCardIndex(reveal.index))?;
            if slot.holder != Some(seat) {
                return Err(HodlemError::Unauthorised);
            }
            if slot.opened.is_some() || !seen.insert(reveal.index) {
                return Err(HodlemError::AlreadySubmitted);
            }
            if !self.fully_decrypted(reveal.index) {
                return Err(HodlemError::NotSubmitted);
            }
            if reveal.value == 0 || usize::from(reveal.value) > CARDS {
                return Err(HodlemError::InvalidProof);
            }
            let card = &base[usize::from(reveal.value)];
            verify_reveal(self.id, seat, &generators, card, &slot.current, reveal).map_err(
                |e| {
                    warn!(deck = self.id, seat, index = reveal.index, error = %e, "reveal rejected");
                    HodlemError::InvalidProof
                },
            )?;
        }

        let id = self.id;
        let hand = self.hand_mut()?;
        for reveal in proofs {
            hand.slots[reveal.index].opened = Some(reveal.value);
        }
        debug!(deck = id, seat, cards = proofs.len(), "revealed");
        Ok(proofs.iter().map(|r| (r.index, r.value)).collect())
    }
}
