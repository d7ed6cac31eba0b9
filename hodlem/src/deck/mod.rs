//! Card-protocol engine.
//!
//! A deck is 53 points on BN254 G1. During prep every seat contributes one
//! key per slot; their sum fixes the base deck, slot 0 being the shared
//! generator and slot `v` the card with value `v`. Each hand the seats
//! shuffle in turn, multiplying every point by a fresh secret key after
//! permuting slots 1 to 52, so slot 0 of each stage publicly tracks the keys
//! applied so far. Dealing is the reverse: every seat except a card's holder
//! strips its key from that card, proving with a discrete-log-equality proof
//! against its stage generators that it used the same key.
//!
//! The engine never moves funds; it only accepts or rejects submissions.

pub mod deal;
pub mod prep;
pub mod shuffle;
pub mod wire;

use crate::cards::DECK_SIZE;
use crate::error::{HodlemError, Result};
use crate::types::{DeckId, SeatIndex};

use blake2::Blake2s256;
use hodlem_proofs::commitment::Commitment;
use hodlem_proofs::utils::rand::FiatShamirRng;
use hodlem_proofs::zkp::arguments::shuffle::Seed;
use hodlem_proofs::zkp::{arguments, proofs::chaum_pedersen_dl_equality};
use std::collections::BTreeMap;
use tracing::debug;

pub use deal::{DecryptShare, RevealProof};
pub use prep::PrepRow;

pub type Curve = ark_bn254::G1Projective;
pub type Point = ark_bn254::G1Affine;
pub type Scalar = ark_bn254::Fr;
pub type FS = FiatShamirRng<Blake2s256>;
pub type DleqProof = chaum_pedersen_dl_equality::proof::Proof<Curve>;
pub type ShuffleProof = arguments::shuffle::proof::Proof<Curve>;

pub const MAX_PLAYERS: usize = 127;

/// Fiat–Shamir transcript for a proof about one slot of one seat's layer.
pub fn transcript(label: &[u8], deck: DeckId, seat: SeatIndex, slot: usize) -> FS {
    let mut fs = FS::from_seed(label);
    fs.absorb_bytes(&deck.to_le_bytes());
    fs.absorb_bytes(&(seat as u64).to_le_bytes());
    fs.absorb_bytes(&(slot as u64).to_le_bytes());
    fs
}

pub(crate) fn bit(seat: SeatIndex) -> u128 {
    1u128 << seat
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSlot {
    pub current: Point,
    pub dealt: bool,
    pub holder: Option<SeatIndex>,
    /// Seats that have stripped their key from this card.
    pub decrypted: u128,
    pub opened: Option<u8>,
}

/// Per-hand shuffle and deal state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandDeck {
    pub(crate) order: Vec<SeatIndex>,
    pub(crate) rounds: usize,
    /// `stages[0]` is the base deck, `stages[k]` the deck after the k-th shuffle.
    pub(crate) stages: Vec<Vec<Point>>,
    pub(crate) seeds: Vec<Seed>,
    pub(crate) verified: u128,
    pub(crate) slots: Vec<CardSlot>,
}

impl HandDeck {
    /// Shuffle order, which is also the set of seats that must decrypt.
    pub fn order(&self) -> &[SeatIndex] {
        &self.order
    }

    pub fn position(&self, seat: SeatIndex) -> Option<usize> {
        self.order.iter().position(|s| *s == seat)
    }

    pub fn stages(&self) -> &[Vec<Point>] {
        &self.stages
    }

    /// Slot 0 of stage `k`.
    pub fn stage_generator(&self, k: usize) -> Option<&Point> {
        self.stages.get(k).and_then(|s| s.first())
    }

    pub fn participants(&self) -> u128 {
        self.order.iter().fold(0, |acc, s| acc | bit(*s))
    }

    pub fn slots(&self) -> &[CardSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&CardSlot> {
        self.slots.get(index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckInstance {
    id: DeckId,
    players: usize,
    commits: Vec<Option<Commitment>>,
    keys: Vec<Option<Vec<Point>>>,
    base: Option<Vec<Point>>,
    hand: Option<HandDeck>,
}

impl DeckInstance {
    fn new(id: DeckId, players: usize) -> Self {
        Self {
            id,
            players,
            commits: vec![None; players],
            keys: vec![None; players],
            base: None,
            hand: None,
        }
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    pub fn players(&self) -> usize {
        self.players
    }

    /// Base deck, available once every seat has revealed its prep rows.
    pub fn base(&self) -> Option<&[Point]> {
        self.base.as_deref()
    }

    pub fn hand(&self) -> Option<&HandDeck> {
        self.hand.as_ref()
    }

    pub(crate) fn hand_mut(&mut self) -> Result<&mut HandDeck> {
        self.hand.as_mut().ok_or(HodlemError::WrongPhase)
    }

    pub(crate) fn check_seat(&self, seat: SeatIndex) -> Result<()> {
        if seat >= self.players {
            return Err(HodlemError::InvalidSeatIndex);
        }
        Ok(())
    }

    /// Value of the card whose plaintext point is `point`.
    pub(crate) fn lookup(&self, point: &Point) -> Option<u8> {
        let base = self.base.as_ref()?;
        (1..DECK_SIZE)
            .find(|&v| base[v] == *point)
            .map(|v| v as u8)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeckStore {
    decks: BTreeMap<DeckId, DeckInstance>,
    next_id: DeckId,
}

impl DeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a deck for `players` seats.
    pub fn new_deck(&mut self, players: usize) -> Result<DeckId> {
        if players == 0 || players > MAX_PLAYERS {
            return Err(HodlemError::InvalidPlayers);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.decks.insert(id, DeckInstance::new(id, players));
        debug!(deck = id, players, "new deck");
        Ok(id)
    }

    pub fn get(&self, id: DeckId) -> Result<&DeckInstance> {
        self.decks.get(&id).ok_or(HodlemError::UnknownDeck(id))
    }

    pub(crate) fn replace(&mut self, deck: DeckInstance) {
        self.decks.insert(deck.id, deck);
    }
}

#[cfg(test)]
mod test {
    use super::DeckStore;
    use crate::error::HodlemError;

    #[test]
    fn deck_ids_are_fresh() {
        let mut store = DeckStore::new();
        assert!(matches!(store.new_deck(0), Err(HodlemError::InvalidPlayers)));
        assert!(matches!(store.new_deck(128), Err(HodlemError::InvalidPlayers)));
        let a = store.new_deck(127).unwrap();
        let b = store.new_deck(13).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.get(a).unwrap().players(), 127);
        assert!(matches!(store.get(99), Err(HodlemError::UnknownDeck(99))));
    }
}
