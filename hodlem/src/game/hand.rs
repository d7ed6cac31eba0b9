use super::pot::{build_pots, split, Contribution, Settlement};
use super::ranking::HandRank;
use crate::cards::Card;
use crate::error::{HodlemError, Result};
use crate::events::Event;
use crate::types::{Amount, SeatIndex, TableId};

use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Dealing step of the dealer draw that precedes a table's first hand.
pub const DRAW: u8 = 0;
pub const PREFLOP: u8 = 1;
pub const FLOP: u8 = 2;
pub const TURN: u8 = 3;
pub const RIVER: u8 = 4;
pub const SHOWDOWN: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Fold,
    /// Check when nothing is owed.
    Call,
    /// Chips added by this action, on top of the seat's current street bet.
    Raise(Amount),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Turn(SeatIndex),
    StreetClosed,
    /// Only this seat is left in the hand.
    HandOver(SeatIndex),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contender {
    pub seat: SeatIndex,
    /// Stack when the hand started.
    pub stack: Amount,
    pub committed: Amount,
    pub street_bet: Amount,
    pub folded: bool,
    pub acted: bool,
    pub shown: Option<HandRank>,
}

impl Contender {
    fn new(seat: SeatIndex, stack: Amount) -> Self {
        Self {
            seat,
            stack,
            committed: 0,
            street_bet: 0,
            folded: false,
            acted: false,
            shown: None,
        }
    }

    pub fn remaining(&self) -> Amount {
        self.stack - self.committed
    }

    /// Still in the hand with chips behind.
    pub fn active(&self) -> bool {
        !self.folded && self.remaining() > 0
    }

    fn put_in(&mut self, amount: Amount) {
        self.committed += amount;
        self.street_bet += amount;
    }
}

/// Betting state of one hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    table: TableId,
    dealer: SeatIndex,
    contenders: Vec<Contender>,
    street: u8,
    to_call: Amount,
    min_raise: Amount,
    big_blind: Amount,
    last_aggressor: Option<SeatIndex>,
    turn: Option<SeatIndex>,
    first_preflop: usize,
}

impl Hand {
    /// Deal in `seats` (seat, stack) and post blinds. Heads-up the dealer
    /// posts the small blind; otherwise the two seats after the dealer do.
    pub fn new(
        table: TableId,
        dealer: SeatIndex,
        seats: &[(SeatIndex, Amount)],
        small_blind: Amount,
    ) -> Self {
        let mut contenders: Vec<Contender> = seats
            .iter()
            .map(|&(seat, stack)| Contender::new(seat, stack))
            .collect();
        contenders.sort_by_key(|c| c.seat);

        let n = contenders.len();
        let dealer_idx = contenders
            .iter()
            .position(|c| c.seat == dealer)
            .unwrap_or(0);
        let (sb, bb) = if n == 2 {
            (dealer_idx, (dealer_idx + 1) % n)
        } else {
            ((dealer_idx + 1) % n, (dealer_idx + 2) % n)
        };
        let big_blind = small_blind * 2;

        for (idx, blind) in [(sb, small_blind), (bb, big_blind)] {
            if let Some(c) = contenders.get_mut(idx) {
                let posted = blind.min(c.remaining());
                c.put_in(posted);
            }
        }

        let first_preflop = if n == 2 { sb } else { (bb + 1) % n.max(1) };

        Self {
            table,
            dealer,
            contenders,
            street: PREFLOP,
            to_call: big_blind,
            min_raise: big_blind,
            big_blind,
            last_aggressor: None,
            turn: None,
            first_preflop,
        }
    }

    pub fn dealer(&self) -> SeatIndex {
        self.dealer
    }

    pub fn street(&self) -> u8 {
        self.street
    }

    pub fn turn(&self) -> Option<SeatIndex> {
        self.turn
    }

    pub fn to_call(&self) -> Amount {
        self.to_call
    }

    pub fn contenders(&self) -> &[Contender] {
        &self.contenders
    }

    pub fn contender(&self, seat: SeatIndex) -> Option<&Contender> {
        self.contenders.iter().find(|c| c.seat == seat)
    }

    /// Seats dealt into the hand, in seat order.
    pub fn seats(&self) -> Vec<SeatIndex> {
        self.contenders.iter().map(|c| c.seat).collect()
    }

    /// Seats that have neither folded nor mucked.
    pub fn live(&self) -> Vec<SeatIndex> {
        self.contenders
            .iter()
            .filter(|c| !c.folded)
            .map(|c| c.seat)
            .collect()
    }

    pub fn pot(&self) -> Amount {
        self.contenders.iter().map(|c| c.committed).sum()
    }

    fn index(&self, seat: SeatIndex) -> Option<usize> {
        self.contenders.iter().position(|c| c.seat == seat)
    }

    fn dealer_index(&self) -> usize {
        self.index(self.dealer).unwrap_or(0)
    }

    fn others_active(&self, i: usize) -> bool {
        self.contenders
            .iter()
            .enumerate()
            .any(|(j, c)| j != i && c.active())
    }

    fn needs_action(&self, i: usize) -> bool {
        let c = &self.contenders[i];
        c.active() && (c.street_bet < self.to_call || (!c.acted && self.others_active(i)))
    }

    /// First seat from index `start` on, clockwise, that still has to act.
    fn next_from(&self, start: usize) -> Option<SeatIndex> {
        let n = self.contenders.len();
        (0..n)
            .map(|k| (start + k) % n)
            .find(|&i| self.needs_action(i))
            .map(|i| self.contenders[i].seat)
    }

    /// Open betting on the current street. `None` when nobody can bet, in
    /// which case the street is dealt without action.
    pub fn open_street(&mut self) -> Option<SeatIndex> {
        let start = if self.street == PREFLOP {
            self.first_preflop
        } else {
            self.dealer_index() + 1
        };
        self.turn = if self.contenders.is_empty() {
            None
        } else {
            self.next_from(start % self.contenders.len())
        };
        self.turn
    }

    pub fn advance_street(&mut self) {
        self.street += 1;
        for c in self.contenders.iter_mut() {
            c.street_bet = 0;
            c.acted = false;
        }
        self.to_call = 0;
        self.min_raise = self.big_blind;
        self.last_aggressor = None;
        self.turn = None;
    }

    pub fn apply(&mut self, seat: SeatIndex, action: Action) -> Result<(Vec<Event>, Progress)> {
        if self.turn != Some(seat) {
            return Err(HodlemError::WrongTurn);
        }
        let i = self.index(seat).ok_or(HodlemError::WrongTurn)?;
        let table = self.table;

        let event = match action {
            Action::Fold => {
                self.contenders[i].folded = true;
                Event::Fold { table, seat }
            }
            Action::Call => {
                let c = &mut self.contenders[i];
                let owed = self.to_call.saturating_sub(c.street_bet).min(c.remaining());
                c.put_in(owed);
                Event::CallBet {
                    table,
                    seat,
                    amount: owed,
                }
            }
            Action::Raise(size) => {
                self.raise(i, size)?;
                Event::RaiseBet {
                    table,
                    seat,
                    amount: size,
                }
            }
        };
        self.contenders[i].acted = true;

        let live = self.live();
        let progress = if live.len() == 1 {
            Progress::HandOver(live[0])
        } else {
            match self.next_from((i + 1) % self.contenders.len()) {
                Some(next) => Progress::Turn(next),
                None => Progress::StreetClosed,
            }
        };
        self.turn = match progress {
            Progress::Turn(next) => Some(next),
            _ => None,
        };

        Ok((vec![event], progress))
    }

    fn raise(&mut self, i: usize, size: Amount) -> Result<()> {
        let c = &self.contenders[i];
        let owed = self.to_call.saturating_sub(c.street_bet);
        // a short all-in raise does not reopen the action for seats that
        // already acted
        if size <= owed || !self.others_active(i) || c.acted {
            return Err(HodlemError::NotABetOrRaise);
        }
        if size > c.remaining() {
            return Err(HodlemError::SizeExceedsStack);
        }
        let all_in = size == c.remaining();
        let new_bet = c.street_bet + size;
        let increment = new_bet - self.to_call;
        if increment < self.min_raise && !all_in {
            return Err(HodlemError::BelowMinimum);
        }

        self.contenders[i].put_in(size);
        self.to_call = new_bet;
        self.last_aggressor = Some(self.contenders[i].seat);
        if increment >= self.min_raise {
            // a full raise reopens the action
            self.min_raise = increment;
            for (j, other) in self.contenders.iter_mut().enumerate() {
                if j != i {
                    other.acted = false;
                }
            }
        }
        Ok(())
    }

    /// Showdown order: the last aggressor first, otherwise the first live
    /// seat after the dealer, then clockwise.
    pub fn showdown_order(&self) -> Vec<SeatIndex> {
        let n = self.contenders.len();
        let start = self
            .last_aggressor
            .and_then(|s| self.index(s))
            .filter(|&i| !self.contenders[i].folded)
            .unwrap_or(self.dealer_index() + 1);
        (0..n)
            .map(|k| &self.contenders[(start + k) % n])
            .filter(|c| !c.folded)
            .map(|c| c.seat)
            .collect()
    }

    pub(crate) fn set_turn(&mut self, seat: Option<SeatIndex>) {
        self.turn = seat;
    }

    pub fn record_show(&mut self, seat: SeatIndex, rank: HandRank) {
        if let Some(i) = self.index(seat) {
            self.contenders[i].shown = Some(rank);
        }
    }

    /// Give up at showdown without revealing.
    pub fn muck(&mut self, seat: SeatIndex) {
        if let Some(i) = self.index(seat) {
            self.contenders[i].folded = true;
        }
    }

    /// The last seat standing takes every pot it is eligible for and its own
    /// uncalled chips. Chips it never matched go back to their contributors.
    pub fn settle_uncontested(&self, winner: SeatIndex) -> Settlement {
        let contributions: Vec<Contribution> = self
            .contenders
            .iter()
            .map(|c| Contribution {
                seat: c.seat,
                amount: c.committed,
                contending: c.seat == winner,
            })
            .collect();
        let (pots, returned) = build_pots(&contributions);

        let mut won: Amount = pots.iter().map(|p| p.amount).sum();
        let mut refunds = Vec::new();
        for (seat, amount) in returned {
            if seat == winner {
                won += amount;
            } else {
                refunds.push((seat, amount));
            }
        }
        Settlement {
            awards: vec![(winner, won)],
            refunds,
        }
    }

    /// Award every pot to its best shown hands. Odd units go to the tied seat
    /// with the highest hole card, then the higher second hole card, then the
    /// lowest seat index.
    pub fn settle_showdown(&self, holes: &BTreeMap<SeatIndex, [Card; 2]>) -> Settlement {
        let contributions: Vec<Contribution> = self
            .contenders
            .iter()
            .map(|c| Contribution {
                seat: c.seat,
                amount: c.committed,
                contending: !c.folded && c.shown.is_some(),
            })
            .collect();
        let (pots, refunds) = build_pots(&contributions);

        let priority = |seat: &SeatIndex| {
            let (high, low) = holes.get(seat).map_or((0, 0), |[a, b]| {
                (a.rank().max(b.rank()), a.rank().min(b.rank()))
            });
            (Reverse(high), Reverse(low), *seat)
        };

        let mut awards = Vec::new();
        for pot in pots {
            let ranked: Vec<(SeatIndex, HandRank)> = pot
                .eligible
                .iter()
                .filter_map(|s| self.contender(*s).and_then(|c| c.shown).map(|r| (*s, r)))
                .collect();
            let Some(best) = ranked.iter().map(|(_, r)| *r).max() else {
                continue;
            };
            let mut winners: Vec<SeatIndex> = ranked
                .iter()
                .filter(|(_, r)| *r == best)
                .map(|(s, _)| *s)
                .collect();
            winners.sort_by_key(priority);
            awards.extend(split(pot.amount, &winners));
        }

        Settlement { awards, refunds }
    }
}
