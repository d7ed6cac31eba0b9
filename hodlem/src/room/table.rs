use crate::config::TableConfig;
use crate::error::{HodlemError, Result};
use crate::game::Hand;
use crate::types::{Address, Amount, BlockNumber, DeckId, SeatIndex, TableId};

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Join,
    Prep,
    Shuffle,
    Verify,
    Deal,
    /// Seats open their dealer-draw cards in seat order.
    Draw,
    Act,
    Showdown,
    Ended,
}

/// The active phase, its deadline, who has submitted and whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseCommit {
    pub phase: Phase,
    pub deadline: BlockNumber,
    pub submitted: u128,
    pub turn: Option<SeatIndex>,
}

impl PhaseCommit {
    fn new(phase: Phase, deadline: BlockNumber) -> Self {
        Self {
            phase,
            deadline,
            submitted: 0,
            turn: None,
        }
    }

    pub fn has(&self, seat: SeatIndex) -> bool {
        self.submitted & (1u128 << seat) != 0
    }

    pub(crate) fn mark(&mut self, seat: SeatIndex) {
        self.submitted |= 1u128 << seat;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seat {
    pub player: Address,
    pub bond: Amount,
    /// Includes chips committed to the hand in progress; only settlement
    /// moves them.
    pub stack: Amount,
}

/// Cards being dealt in the current step. Street 0 is the dealer draw,
/// street 1 the hole cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DealStep {
    pub street: u8,
    pub slots: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct Table {
    pub(crate) id: TableId,
    pub(crate) config: TableConfig,
    pub(crate) game: Address,
    pub(crate) deck: DeckId,
    pub(crate) seats: Vec<Option<Seat>>,
    pub(crate) escrow: Amount,
    pub(crate) commit: PhaseCommit,
    pub(crate) dealer: Option<SeatIndex>,
    pub(crate) level_origin: BlockNumber,
    pub(crate) hand: Option<Hand>,
    pub(crate) deal: Option<DealStep>,
    pub(crate) next_slot: usize,
    pub(crate) holes: BTreeMap<SeatIndex, [usize; 2]>,
    pub(crate) board: Vec<usize>,
    pub(crate) showdown: Vec<SeatIndex>,
    /// Dealer-draw slot of each seat, until the first dealer is known.
    pub(crate) draws: BTreeMap<SeatIndex, usize>,
}

impl Table {
    pub(crate) fn new(id: TableId, config: TableConfig, game: Address, deck: DeckId) -> Self {
        let seats = vec![None; config.starts_with];
        Self {
            id,
            config,
            game,
            deck,
            seats,
            escrow: 0,
            commit: PhaseCommit::new(Phase::Join, 0),
            dealer: None,
            level_origin: 0,
            hand: None,
            deal: None,
            next_slot: 1,
            holes: BTreeMap::new(),
            board: Vec::new(),
            showdown: Vec::new(),
            draws: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn game(&self) -> Address {
        self.game
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck
    }

    pub fn phase(&self) -> Phase {
        self.commit.phase
    }

    pub fn commit(&self) -> &PhaseCommit {
        &self.commit
    }

    pub fn seat(&self, seat: SeatIndex) -> Option<&Seat> {
        self.seats.get(seat).and_then(Option::as_ref)
    }

    pub fn seats(&self) -> &[Option<Seat>] {
        &self.seats
    }

    pub fn escrow(&self) -> Amount {
        self.escrow
    }

    pub fn dealer(&self) -> Option<SeatIndex> {
        self.dealer
    }

    pub fn hand(&self) -> Option<&Hand> {
        self.hand.as_ref()
    }

    pub fn deal_step(&self) -> Option<&DealStep> {
        self.deal.as_ref()
    }

    /// Deck slots holding `seat`'s hole cards this hand.
    pub fn hole_slots(&self, seat: SeatIndex) -> Option<[usize; 2]> {
        self.holes.get(&seat).copied()
    }

    /// Deck slot of `seat`'s dealer-draw card.
    pub fn draw_slot(&self, seat: SeatIndex) -> Option<usize> {
        self.draws.get(&seat).copied()
    }

    pub fn board_slots(&self) -> &[usize] {
        &self.board
    }

    /// Occupied seat indices in seat order.
    pub fn occupied(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    /// `escrow == Σ(bond + stack)` over occupied seats.
    pub fn escrow_balanced(&self) -> bool {
        let held: Amount = self.seats.iter().flatten().map(|s| s.bond + s.stack).sum();
        held == self.escrow
    }

    pub(crate) fn expect_phase(&self, phase: Phase) -> Result<()> {
        if self.commit.phase != phase {
            return Err(HodlemError::WrongPhase);
        }
        Ok(())
    }

    /// The seat exists and `sender` sits in it.
    pub(crate) fn expect_player(&self, seat: SeatIndex, sender: Address) -> Result<&Seat> {
        let occupant = self
            .seats
            .get(seat)
            .ok_or(HodlemError::InvalidSeatIndex)?
            .as_ref()
            .ok_or(HodlemError::Unauthorised)?;
        if occupant.player != sender {
            return Err(HodlemError::Unauthorised);
        }
        Ok(occupant)
    }

    pub(crate) fn expect_occupied(&self, seat: SeatIndex) -> Result<&Seat> {
        self.seats
            .get(seat)
            .and_then(Option::as_ref)
            .ok_or(HodlemError::InvalidSeatIndex)
    }

    pub(crate) fn enter(&mut self, phase: Phase, deadline: BlockNumber) {
        self.commit = PhaseCommit::new(phase, deadline);
    }

    /// Next occupied seat strictly after `seat`, wrapping around.
    pub(crate) fn next_occupied(&self, seat: SeatIndex) -> Option<SeatIndex> {
        let n = self.seats.len();
        (1..=n)
            .map(|k| (seat + k) % n)
            .find(|&i| self.seats[i].is_some())
    }
}
