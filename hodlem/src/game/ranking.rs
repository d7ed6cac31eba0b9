//! Hand strength as a single ordered integer.
//!
//! `HandRank` packs the category into bits 40..48 and five tie-break ranks,
//! most significant first, into the five bytes below it. Ranks run from 2
//! (deuce) to 14 (ace); the ace of a wheel straight counts as 1. Comparing two
//! ranks as integers compares the hands.

use crate::cards::Card;

use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Category {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    Set = 4,
    Straight = 5,
    Flush = 6,
    Boat = 7,
    Quads = 8,
    StraightFlush = 9,
}

impl Category {
    fn from_u8(n: u8) -> Option<Self> {
        Some(match n {
            1 => Category::HighCard,
            2 => Category::Pair,
            3 => Category::TwoPair,
            4 => Category::Set,
            5 => Category::Straight,
            6 => Category::Flush,
            7 => Category::Boat,
            8 => Category::Quads,
            9 => Category::StraightFlush,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::Set => "Set",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::Boat => "Boat",
            Category::Quads => "Quads",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HandRank(pub u64);

impl HandRank {
    pub fn new(category: Category, ranks: [u8; 5]) -> Self {
        let packed = ranks
            .iter()
            .fold(category as u64, |acc, r| (acc << 8) | u64::from(*r));
        HandRank(packed)
    }

    pub fn category(self) -> Option<Category> {
        Category::from_u8((self.0 >> 40) as u8)
    }

    pub fn tie_breaks(self) -> [u8; 5] {
        let mut out = [0u8; 5];
        for (i, r) in out.iter_mut().enumerate() {
            *r = (self.0 >> (8 * (4 - i))) as u8;
        }
        out
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.category().map_or("None", Category::name);
        write!(f, "{}: {:?}", name, self.tie_breaks())
    }
}

/// Highest card of a five-rank straight, if `ranks` (descending, distinct) is one.
fn straight_high(ranks: &[u8]) -> Option<u8> {
    if ranks.len() != 5 {
        return None;
    }
    if ranks.windows(2).all(|w| w[0] == w[1] + 1) {
        return Some(ranks[0]);
    }
    // wheel
    if ranks == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

pub fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    let mut counts = [0u8; 15];
    for card in cards {
        counts[usize::from(card.rank())] += 1;
    }

    // ranks ordered by (multiplicity, rank), both descending
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|r| counts[usize::from(*r)] > 0)
        .map(|r| (counts[usize::from(r)], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let mut expanded = [0u8; 5];
    let mut i = 0;
    for (count, rank) in &groups {
        for _ in 0..*count {
            expanded[i] = *rank;
            i += 1;
        }
    }

    let distinct: Vec<u8> = groups.iter().map(|(_, r)| *r).collect();
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight = straight_high(&distinct);

    let run = |high: u8| [high, high - 1, high - 2, high - 3, high - 4];

    match (straight, flush, groups[0].0, groups.get(1).map(|g| g.0)) {
        (Some(high), true, _, _) => HandRank::new(Category::StraightFlush, run(high)),
        (_, _, 4, _) => HandRank::new(Category::Quads, expanded),
        (_, _, 3, Some(2)) => HandRank::new(Category::Boat, expanded),
        (_, true, _, _) => HandRank::new(Category::Flush, expanded),
        (Some(high), _, _, _) => HandRank::new(Category::Straight, run(high)),
        (_, _, 3, _) => HandRank::new(Category::Set, expanded),
        (_, _, 2, Some(2)) => HandRank::new(Category::TwoPair, expanded),
        (_, _, 2, _) => HandRank::new(Category::Pair, expanded),
        _ => HandRank::new(Category::HighCard, expanded),
    }
}

/// Best five-card hand among `cards`; fewer than five cards rank as nothing.
pub fn best_hand(cards: &[Card]) -> HandRank {
    let n = cards.len();
    let mut best = HandRank::default();
    if n < 5 {
        return best;
    }
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        best = best.max(evaluate_five(&five));
                    }
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;

    fn hand(spec: &[(u8, u8)]) -> Vec<Card> {
        spec.iter()
            .map(|&(rank, suit)| Card::from_parts(rank, suit).unwrap())
            .collect()
    }

    fn five(spec: &[(u8, u8)]) -> HandRank {
        let cards = hand(spec);
        evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]])
    }

    #[test]
    fn categories() {
        let cases = [
            (five(&[(14, 0), (13, 0), (12, 0), (11, 0), (10, 0)]), Category::StraightFlush),
            (five(&[(9, 0), (9, 1), (9, 2), (9, 3), (2, 0)]), Category::Quads),
            (five(&[(9, 0), (9, 1), (9, 2), (3, 3), (3, 0)]), Category::Boat),
            (five(&[(2, 1), (5, 1), (9, 1), (11, 1), (13, 1)]), Category::Flush),
            (five(&[(14, 0), (2, 1), (3, 2), (4, 3), (5, 0)]), Category::Straight),
            (five(&[(7, 0), (7, 1), (7, 2), (3, 3), (2, 0)]), Category::Set),
            (five(&[(7, 0), (7, 1), (3, 2), (3, 3), (2, 0)]), Category::TwoPair),
            (five(&[(7, 0), (7, 1), (4, 2), (3, 3), (2, 0)]), Category::Pair),
            (five(&[(7, 0), (9, 1), (4, 2), (3, 3), (2, 0)]), Category::HighCard),
        ];
        for (rank, category) in cases {
            assert_eq!(rank.category(), Some(category));
        }
    }

    #[test]
    fn wheel_is_lowest_straight() {
        let wheel = five(&[(14, 0), (2, 1), (3, 2), (4, 3), (5, 0)]);
        let six_high = five(&[(6, 0), (2, 1), (3, 2), (4, 3), (5, 0)]);
        assert!(wheel < six_high);
        assert_eq!(wheel.tie_breaks(), [5, 4, 3, 2, 1]);
    }

    #[test]
    fn kickers_decide() {
        let aces_king = five(&[(14, 0), (14, 1), (13, 2), (4, 3), (2, 0)]);
        let aces_queen = five(&[(14, 2), (14, 3), (12, 2), (4, 0), (2, 1)]);
        assert!(aces_king > aces_queen);
        assert_eq!(aces_king.tie_breaks(), [14, 14, 13, 4, 2]);
    }

    #[test]
    fn best_of_seven() {
        let cards = hand(&[(14, 0), (14, 1), (13, 0), (12, 0), (11, 0), (10, 0), (2, 3)]);
        assert_eq!(best_hand(&cards).category(), Some(Category::StraightFlush));
        assert_eq!(best_hand(&cards[..4]), HandRank::default());
    }

    #[test]
    fn display_names_category() {
        let boat = five(&[(9, 0), (9, 1), (9, 2), (3, 3), (3, 0)]);
        assert_eq!(boat.to_string(), "Boat: [9, 9, 9, 3, 3]");
    }
}
