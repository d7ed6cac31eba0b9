//! Client side of the card protocol: one seat's secrets and the proofs it
//! submits to a [`Room`](crate::room::Room).

use crate::cards::{Card, DECK_SIZE};
use crate::deck::deal::{DECRYPT_LABEL, REVEAL_LABEL};
use crate::deck::prep::{prep_commitment, PREP_LABEL};
use crate::deck::shuffle::unpack_bits;
use crate::deck::{
    transcript, Curve, DeckInstance, DecryptShare, HandDeck, Point, PrepRow, RevealProof, Scalar,
    ShuffleProof,
};
use crate::types::{DeckId, SeatIndex};

use ark_ec::CurveGroup;
use ark_ff::{Field, UniformRand, Zero};
use ark_std::rand::Rng;
use hodlem_proofs::commitment::Commitment;
use hodlem_proofs::utils::permutation::Permutation;
use hodlem_proofs::zkp::arguments::shuffle::prover::{Prover, RoundSecrets};
use hodlem_proofs::zkp::arguments::shuffle::Seed;
use hodlem_proofs::zkp::proofs::chaum_pedersen_dl_equality::{DLEquality, Parameters, Statement};
use hodlem_proofs::zkp::ArgumentOfKnowledge;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PlayerErrors {
    #[error("No shuffle in progress")]
    NotShuffled,

    #[error("Not dealt into this hand")]
    NotInHand,

    #[error("Card {0} is not ready to open")]
    NotReady(usize),

    #[error("Card {0} is not in the deck")]
    UnknownCard(usize),
}

fn nonzero_scalar<R: Rng>(rng: &mut R) -> Scalar {
    loop {
        let x = Scalar::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

struct ShuffleSecrets {
    key: Scalar,
    inverse: Scalar,
    permutation: Permutation,
    rounds: RoundSecrets<Curve>,
}

/// Secrets of one seat at one deck.
pub struct Player {
    deck: DeckId,
    seat: SeatIndex,
    rows: Vec<PrepRow>,
    shuffle: Option<ShuffleSecrets>,
}

impl Player {
    pub fn new(deck: DeckId, seat: SeatIndex) -> Self {
        Self {
            deck,
            seat,
            rows: Vec::new(),
            shuffle: None,
        }
    }

    pub fn seat(&self) -> SeatIndex {
        self.seat
    }

    /// Draw the per-slot prep keys and return the commitment to publish.
    pub fn prepare<R: Rng>(&mut self, rng: &mut R) -> anyhow::Result<Commitment> {
        let mut rows = Vec::with_capacity(DECK_SIZE);
        for slot in 0..DECK_SIZE {
            let g = Curve::rand(rng).into_affine();
            let h = Curve::rand(rng).into_affine();
            let x = nonzero_scalar(rng);
            let gx = (g * x).into_affine();
            let hx = (h * x).into_affine();

            let parameters = Parameters::<Curve>::new(&g, &h);
            let statement = Statement::<Curve>::new(&gx, &hx);
            let mut fs_rng = transcript(PREP_LABEL, self.deck, self.seat, slot);
            let proof = DLEquality::<Curve>::prove(rng, &parameters, &statement, &x, &mut fs_rng)?;
            rows.push(PrepRow {
                g,
                h,
                gx,
                hx,
                proof,
            });
        }
        let commitment = prep_commitment(&rows)?;
        self.rows = rows;
        Ok(commitment)
    }

    /// Rows opening the commitment from [`Player::prepare`].
    pub fn prep_rows(&self) -> &[PrepRow] {
        &self.rows
    }

    /// Shuffle and re-encrypt `previous`, committing to `rounds` rounds of
    /// the shuffle argument. Returns the deck and seed to submit.
    pub fn shuffle<R: Rng>(
        &mut self,
        rng: &mut R,
        previous: &[Point],
        rounds: usize,
    ) -> anyhow::Result<(Vec<Point>, Seed)> {
        let permutation = Permutation::fixing_first(rng, previous.len());
        let key = nonzero_scalar(rng);
        let inverse = key.inverse().ok_or(PlayerErrors::NotShuffled)?;

        let shuffled = Prover::<Curve>::shuffle(previous, &permutation, key)?;
        let rounds = Prover::<Curve>::commit(rng, &shuffled, rounds)?;
        let seed = rounds.seed;
        self.shuffle = Some(ShuffleSecrets {
            key,
            inverse,
            permutation,
            rounds,
        });
        Ok((shuffled, seed))
    }

    /// Answer the challenge bits emitted for this seat's shuffle.
    pub fn prove_shuffle(&self, bits: u64) -> anyhow::Result<ShuffleProof> {
        let secrets = self.shuffle.as_ref().ok_or(PlayerErrors::NotShuffled)?;
        let bits = unpack_bits(bits, secrets.rounds.rows.len());
        Ok(Prover::<Curve>::respond(
            &secrets.rounds,
            &bits,
            &secrets.permutation,
            secrets.key,
        )?)
    }

    fn generators<'a>(&self, hand: &'a HandDeck) -> anyhow::Result<(&'a Point, &'a Point)> {
        let position = hand.position(self.seat).ok_or(PlayerErrors::NotInHand)?;
        match (
            hand.stage_generator(position),
            hand.stage_generator(position + 1),
        ) {
            (Some(before), Some(after)) => Ok((before, after)),
            _ => Err(PlayerErrors::NotShuffled.into()),
        }
    }

    /// Decryption shares for every card in `slots` this seat still owes.
    pub fn decrypt_shares<R: Rng>(
        &self,
        rng: &mut R,
        deck: &DeckInstance,
        slots: &[usize],
    ) -> anyhow::Result<Vec<DecryptShare>> {
        let secrets = self.shuffle.as_ref().ok_or(PlayerErrors::NotShuffled)?;
        let hand = deck.hand().ok_or(PlayerErrors::NotInHand)?;
        let (before, after) = self.generators(hand)?;

        let mut shares = Vec::new();
        for &index in slots {
            if !deck.owes_share(self.seat, index) {
                continue;
            }
            let current = hand.slot(index).ok_or(PlayerErrors::UnknownCard(index))?.current;
            let share = (current * secrets.inverse).into_affine();

            let parameters = Parameters::<Curve>::new(before, &share);
            let statement = Statement::<Curve>::new(after, &current);
            let mut fs_rng = transcript(DECRYPT_LABEL, self.deck, self.seat, index);
            let proof = DLEquality::<Curve>::prove(rng, &parameters, &statement, &secrets.key, &mut fs_rng)?;
            shares.push(DecryptShare {
                index,
                share,
                proof,
            });
        }
        Ok(shares)
    }

    /// Privately read one of this seat's hole cards.
    pub fn peek(&self, deck: &DeckInstance, index: usize) -> anyhow::Result<Card> {
        let secrets = self.shuffle.as_ref().ok_or(PlayerErrors::NotShuffled)?;
        if !deck.fully_decrypted(index) {
            return Err(PlayerErrors::NotReady(index).into());
        }
        let hand = deck.hand().ok_or(PlayerErrors::NotInHand)?;
        let current = hand.slot(index).ok_or(PlayerErrors::UnknownCard(index))?.current;
        let plain = (current * secrets.inverse).into_affine();
        let value = deck.lookup(&plain).ok_or(PlayerErrors::UnknownCard(index))?;
        Ok(Card::new(value).ok_or(PlayerErrors::UnknownCard(index))?)
    }

    /// Proofs opening this seat's cards in `slots` to everyone.
    pub fn reveal<R: Rng>(
        &self,
        rng: &mut R,
        deck: &DeckInstance,
        slots: &[usize],
    ) -> anyhow::Result<Vec<RevealProof>> {
        let secrets = self.shuffle.as_ref().ok_or(PlayerErrors::NotShuffled)?;
        let hand = deck.hand().ok_or(PlayerErrors::NotInHand)?;
        let base = deck.base().ok_or(PlayerErrors::NotInHand)?;
        let (before, after) = self.generators(hand)?;

        slots
            .iter()
            .map(|&index| -> anyhow::Result<RevealProof> {
                let card = self.peek(deck, index)?;
                let current = hand.slot(index).ok_or(PlayerErrors::UnknownCard(index))?.current;
                let plain = &base[usize::from(card.value())];

                let parameters = Parameters::<Curve>::new(before, plain);
                let statement = Statement::<Curve>::new(after, &current);
                let mut fs_rng = transcript(REVEAL_LABEL, self.deck, self.seat, index);
                let proof =
                    DLEquality::<Curve>::prove(rng, &parameters, &statement, &secrets.key, &mut fs_rng)?;
                Ok(RevealProof {
                    index,
                    value: card.value(),
                    proof,
                })
            })
            .collect()
    }
}
