use crate::types::{Amount, SeatIndex};

use std::collections::BTreeMap;

/// One seat's total chips put into the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub seat: SeatIndex,
    pub amount: Amount,
    /// Still eligible to win: neither folded nor mucked.
    pub contending: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pot {
    pub amount: Amount,
    pub eligible: Vec<SeatIndex>,
}

/// Where the chips of a finished hand go.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    /// One entry per pot share, in award order.
    pub awards: Vec<(SeatIndex, Amount)>,
    /// Uncalled chips handed back to the seat that bet them.
    pub refunds: Vec<(SeatIndex, Amount)>,
}

impl Settlement {
    pub fn received(&self, seat: SeatIndex) -> Amount {
        self.awards
            .iter()
            .chain(&self.refunds)
            .filter(|(s, _)| *s == seat)
            .map(|(_, a)| a)
            .sum()
    }

    pub fn total(&self) -> Amount {
        self.awards.iter().chain(&self.refunds).map(|(_, a)| a).sum()
    }
}

/// Split contributions into a main pot and side pots.
///
/// The single largest contributor first gets back whatever nobody else put
/// in. Pots are then cut at every distinct contending commitment level;
/// folded chips fill the pots but folded seats are never eligible. Chips
/// above the highest contending level go back to the seats that put them in.
pub fn build_pots(contributions: &[Contribution]) -> (Vec<Pot>, Vec<(SeatIndex, Amount)>) {
    let mut amounts: Vec<(SeatIndex, Amount, bool)> = contributions
        .iter()
        .map(|c| (c.seat, c.amount, c.contending))
        .collect();
    let mut refunds: BTreeMap<SeatIndex, Amount> = BTreeMap::new();

    let mut sorted: Vec<Amount> = amounts.iter().map(|a| a.1).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    if let (Some(&top), second) = (sorted.first(), sorted.get(1).copied().unwrap_or(0)) {
        if top > second {
            if let Some(entry) = amounts.iter_mut().find(|a| a.1 == top) {
                *refunds.entry(entry.0).or_default() += top - second;
                entry.1 = second;
            }
        }
    }

    let mut levels: Vec<Amount> = amounts
        .iter()
        .filter(|a| a.2 && a.1 > 0)
        .map(|a| a.1)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    let mut floor = 0;
    for level in levels {
        let amount = amounts
            .iter()
            .map(|a| a.1.min(level) - a.1.min(floor))
            .sum();
        let eligible = amounts
            .iter()
            .filter(|a| a.2 && a.1 >= level)
            .map(|a| a.0)
            .collect();
        pots.push(Pot { amount, eligible });
        floor = level;
    }

    for a in amounts.iter().filter(|a| a.1 > floor) {
        *refunds.entry(a.0).or_default() += a.1 - floor;
    }

    (pots, refunds.into_iter().collect())
}

/// Divide `amount` evenly among `winners`, which must already be in remainder
/// priority order: the first `amount % n` winners get one extra unit.
pub fn split(amount: Amount, winners: &[SeatIndex]) -> Vec<(SeatIndex, Amount)> {
    let n = winners.len() as Amount;
    if n == 0 {
        return Vec::new();
    }
    let share = amount / n;
    let remainder = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, seat)| (*seat, share + Amount::from(i < remainder)))
        .collect()
}
