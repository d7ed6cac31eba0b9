use super::{bit, Curve, DeckInstance, HandDeck, Point, ShuffleProof};
use crate::cards::DECK_SIZE;
use crate::error::{HodlemError, Result};
use crate::types::SeatIndex;

use ark_ec::AffineRepr;
use blake2::Blake2s256;
use hodlem_proofs::error::CryptoError;
use hodlem_proofs::zkp::arguments::shuffle::{challenge, Parameters, Seed};
use tracing::{debug, info, warn};

/// Pack challenge bits, round `i` into bit `i`.
pub fn pack_bits(bits: &[bool]) -> u64 {
    bits.iter()
        .enumerate()
        .fold(0u64, |acc, (i, b)| acc | (u64::from(*b) << i))
}

pub fn unpack_bits(packed: u64, rounds: usize) -> Vec<bool> {
    (0..rounds).map(|i| (packed >> i) & 1 == 1).collect()
}

impl DeckInstance {
    /// Begin a hand: the base deck is stage 0 and `order` shuffles in turn.
    pub fn start_hand(&mut self, order: Vec<SeatIndex>, rounds: usize) -> Result<()> {
        let base = self.base.clone().ok_or(HodlemError::WrongPhase)?;
        for seat in &order {
            self.check_seat(*seat)?;
        }
        debug!(deck = self.id, ?order, "hand started");
        self.hand = Some(HandDeck {
            order,
            rounds,
            stages: vec![base],
            seeds: Vec::new(),
            verified: 0,
            slots: Vec::new(),
        });
        Ok(())
    }

    /// Shuffles submitted so far this hand.
    pub fn shuffles_done(&self) -> usize {
        self.hand.as_ref().map_or(0, |h| h.stages.len() - 1)
    }

    /// Accept `seat`'s re-encrypted deck and return its challenge bits.
    pub fn submit_shuffle(&mut self, seat: SeatIndex, deck: Vec<Point>, seed: Seed) -> Result<u64> {
        let id = self.id;
        let hand = self.hand_mut()?;
        let position = hand.position(seat).ok_or(HodlemError::Unauthorised)?;
        let done = hand.stages.len() - 1;
        if position < done {
            return Err(HodlemError::AlreadySubmitted);
        }
        if position > done {
            return Err(HodlemError::WrongTurn);
        }
        if deck.len() != DECK_SIZE {
            return Err(CryptoError::LengthMismatch {
                expected: DECK_SIZE,
                found: deck.len(),
            }
            .into());
        }
        if deck.iter().any(|p| p.is_zero()) {
            return Err(HodlemError::InvalidShuffleProof);
        }

        let bits = challenge::<Curve, Blake2s256>(&seed, &deck, hand.rounds);
        hand.stages.push(deck);
        hand.seeds.push(seed);
        debug!(deck = id, seat, position, "shuffle submitted");
        Ok(pack_bits(&bits))
    }

    /// Check `seat`'s shuffle proof. Returns true once every shuffle of the
    /// hand has verified and the deck is ready to deal.
    pub fn verify_shuffle(&mut self, seat: SeatIndex, proof: &ShuffleProof) -> Result<bool> {
        let id = self.id;
        let hand = self.hand_mut()?;
        let position = hand.position(seat).ok_or(HodlemError::Unauthorised)?;
        if position + 1 >= hand.stages.len() {
            return Err(HodlemError::NotSubmitted);
        }
        if hand.verified & bit(position) != 0 {
            return Err(HodlemError::AlreadySubmitted);
        }

        let parameters = Parameters::<Curve>::new(
            &hand.stages[position],
            &hand.stages[position + 1],
            hand.rounds,
        );
        proof
            .verify::<Blake2s256>(&parameters, &hand.seeds[position])
            .map_err(|e| {
                warn!(deck = id, seat, error = %e, "shuffle proof rejected");
                HodlemError::InvalidShuffleProof
            })?;

        hand.verified |= bit(position);
        debug!(deck = id, seat, "shuffle verified");

        let shufflers = hand.order.len();
        let complete = hand.stages.len() == shufflers + 1
            && (0..shufflers).all(|p| hand.verified & bit(p) != 0);
        if complete {
            let last = &hand.stages[shufflers];
            hand.slots = last
                .iter()
                .map(|current| super::CardSlot {
                    current: *current,
                    dealt: false,
                    holder: None,
                    decrypted: 0,
                    opened: None,
                })
                .collect();
            info!(deck = id, "deck ready to deal");
        }
        Ok(complete)
    }

    pub fn shuffle_verified(&self, seat: SeatIndex) -> bool {
        self.hand
            .as_ref()
            .and_then(|h| h.position(seat).map(|p| h.verified & bit(p) != 0))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use super::{pack_bits, unpack_bits};

    #[test]
    fn bit_packing() {
        let bits = vec![true, false, false, true, true];
        assert_eq!(pack_bits(&bits), 0b11001);
        assert_eq!(unpack_bits(0b11001, 5), bits);
    }
}
