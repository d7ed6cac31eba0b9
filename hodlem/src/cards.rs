//! Plaintext card values.
//!
//! Deck slot 0 carries the shuffle generator; slots 1 to 52 carry cards. A
//! card value `v` in `1..=52` maps to `c = v - 1`, suit `c / 13` and rank
//! `c % 13` (0 is the deuce, 12 the ace).

use std::fmt;

pub const CARDS: usize = 52;
pub const DECK_SIZE: usize = CARDS + 1;

const RANKS: &[u8; 13] = b"23456789TJQKA";
const SUITS: [char; 4] = ['♠', '♥', '♦', '♣'];

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    pub fn new(value: u8) -> Option<Self> {
        (1..=CARDS as u8).contains(&value).then_some(Card(value))
    }

    /// Build a card from rank (2 to 14) and suit (0 to 3).
    pub fn from_parts(rank: u8, suit: u8) -> Option<Self> {
        if !(2..=14).contains(&rank) || suit > 3 {
            return None;
        }
        Some(Card(suit * 13 + (rank - 2) + 1))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Rank from 2 (deuce) to 14 (ace).
    pub fn rank(self) -> u8 {
        (self.0 - 1) % 13 + 2
    }

    pub fn suit(self) -> u8 {
        (self.0 - 1) / 13
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = RANKS[usize::from(self.rank() - 2)] as char;
        write!(f, "{}{}", rank, SUITS[usize::from(self.suit())])
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
