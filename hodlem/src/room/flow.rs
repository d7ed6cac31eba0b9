//! Hand progression: shuffle turns, dealing steps, betting streets and
//! showdown, driven by the entry points in the parent module.

use super::table::{DealStep, Phase, Table};
use crate::cards::Card;
use crate::deck::DeckInstance;
use crate::error::{HodlemError, Result};
use crate::events::Event;
use crate::game::hand::{DRAW, FLOP, PREFLOP, SHOWDOWN};
use crate::game::ranking::{best_hand, HandRank};
use crate::game::{Hand, Settlement};
use crate::types::{Amount, BlockNumber, Receipt, SeatIndex};

use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, info};

impl Table {
    /// Prep is over: fix the blind-level origin and draw for the first
    /// dealer.
    pub(crate) fn begin_play(&mut self, deck: &mut DeckInstance, block: BlockNumber) -> Result<()> {
        self.level_origin = block;
        self.start_draw(deck, block)
    }

    /// Shuffle a fresh deck from which every seat draws one card face up;
    /// the highest card deals first.
    pub(crate) fn start_draw(&mut self, deck: &mut DeckInstance, block: BlockNumber) -> Result<()> {
        self.dealer = None;
        self.hand = None;
        let order = self.start_round(deck, block)?;
        info!(table = self.id, seats = order.len(), "drawing for dealer");
        Ok(())
    }

    /// Post blinds for every occupied seat and hand the deck to the first
    /// shuffler.
    pub(crate) fn start_hand(&mut self, deck: &mut DeckInstance, block: BlockNumber) -> Result<()> {
        let dealer = self.dealer.ok_or(HodlemError::WrongPhase)?;
        let seats: Vec<(SeatIndex, Amount)> = self
            .seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s.stack)))
            .collect();

        let level = block.saturating_sub(self.level_origin) / self.config.level_blocks;
        let small_blind = self.config.small_blind(level);

        self.hand = Some(Hand::new(self.id, dealer, &seats, small_blind));
        self.start_round(deck, block)?;
        info!(table = self.id, dealer, small_blind, seats = seats.len(), "hand started");
        Ok(())
    }

    /// Reset the deck for the occupied seats and open the first shuffle turn.
    fn start_round(&mut self, deck: &mut DeckInstance, block: BlockNumber) -> Result<Vec<SeatIndex>> {
        let order = self.occupied();
        deck.start_hand(order.clone(), self.config.verif_rounds)?;
        self.deal = None;
        self.next_slot = 1;
        self.holes.clear();
        self.board.clear();
        self.showdown.clear();
        self.draws.clear();

        self.enter(Phase::Shuffle, block + self.config.shuff_blocks);
        self.commit.turn = order.first().copied();
        Ok(order)
    }

    /// Pass the shuffle turn on, or open verification after the last one.
    pub(crate) fn shuffle_submitted(
        &mut self,
        deck: &DeckInstance,
        seat: SeatIndex,
        block: BlockNumber,
    ) {
        self.commit.mark(seat);
        let next = deck
            .hand()
            .and_then(|h| h.order().get(deck.shuffles_done()).copied());
        match next {
            Some(next) => {
                self.commit.turn = Some(next);
                self.commit.deadline = block + self.config.shuff_blocks;
            }
            None => {
                self.enter(Phase::Verify, block + self.config.verif_blocks);
                debug!(table = self.id, "all shuffles submitted");
            }
        }
    }

    /// Every shuffle checked out: deal the dealer draw, or the hole cards
    /// once a dealer is seated.
    pub(crate) fn shuffles_verified(
        &mut self,
        deck: &mut DeckInstance,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        if self.dealer.is_some() {
            return self.deal_hole_cards(deck, block, receipt);
        }
        let order = self.occupied();
        let mut slots = Vec::with_capacity(order.len());
        for seat in order {
            let slot = self.take_slot();
            deck.assign(slot, Some(seat))?;
            self.draws.insert(seat, slot);
            slots.push(slot);
        }
        self.open_deal_step(DRAW, slots, block, receipt);
        Ok(())
    }

    /// Deal two hole cards to every seat in the hand, one at a time starting
    /// left of the dealer.
    fn deal_hole_cards(
        &mut self,
        deck: &mut DeckInstance,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        let hand = self.hand.as_ref().ok_or(HodlemError::WrongPhase)?;
        let seats = hand.seats();
        let n = seats.len();
        let dealer_pos = seats.iter().position(|s| *s == hand.dealer()).unwrap_or(0);

        let mut holes: BTreeMap<SeatIndex, [usize; 2]> = BTreeMap::new();
        let mut slots = Vec::with_capacity(2 * n);
        for round in 0..2 {
            for k in 1..=n {
                let seat = seats[(dealer_pos + k) % n];
                let slot = self.take_slot();
                deck.assign(slot, Some(seat))?;
                holes.entry(seat).or_insert([0; 2])[round] = slot;
                slots.push(slot);
            }
        }
        self.holes = holes;
        self.open_deal_step(PREFLOP, slots, block, receipt);
        Ok(())
    }

    fn take_slot(&mut self) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    fn open_deal_step(
        &mut self,
        street: u8,
        slots: Vec<usize>,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) {
        receipt.emit(Event::DealRound {
            table: self.id,
            street,
        });
        debug!(table = self.id, street, ?slots, "dealing");
        self.deal = Some(DealStep { street, slots });
        self.enter(Phase::Deal, block + self.config.deal_blocks);
    }

    /// Every seat has finished its shares for the current step: open betting,
    /// or move straight on when nobody can bet.
    pub(crate) fn close_deal_step(
        &mut self,
        deck: &mut DeckInstance,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        self.deal = None;
        if self.dealer.is_none() {
            let first = self.draws.keys().next().copied();
            self.enter(Phase::Draw, block + self.config.act_blocks);
            self.commit.turn = first;
            return Ok(());
        }
        let hand = self.hand.as_mut().ok_or(HodlemError::WrongPhase)?;
        match hand.open_street() {
            Some(turn) => {
                self.enter(Phase::Act, block + self.config.act_blocks);
                self.commit.turn = Some(turn);
                Ok(())
            }
            None => self.street_closed(deck, block, receipt),
        }
    }

    /// Betting on the current street is over. Deal the next street, or go to
    /// showdown after the river.
    pub(crate) fn street_closed(
        &mut self,
        deck: &mut DeckInstance,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        let hand = self.hand.as_mut().ok_or(HodlemError::WrongPhase)?;
        hand.advance_street();
        let street = hand.street();

        if street == SHOWDOWN {
            receipt.emit(Event::DealRound {
                table: self.id,
                street,
            });
            return self.begin_showdown(block);
        }

        let count = if street == FLOP { 3 } else { 1 };
        let slots: Vec<usize> = (0..count).map(|_| self.take_slot()).collect();
        for slot in &slots {
            deck.assign(*slot, None)?;
        }
        self.board.extend(&slots);
        self.open_deal_step(street, slots, block, receipt);
        Ok(())
    }

    /// `seat` has opened its draw card. Pass the turn on, or seat the dealer
    /// once every card is up and start the first hand.
    pub(crate) fn draw_shown(
        &mut self,
        deck: &mut DeckInstance,
        seat: SeatIndex,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        if let Some(next) = self.draws.keys().copied().find(|s| *s > seat) {
            self.commit.turn = Some(next);
            self.commit.deadline = block + self.config.act_blocks;
            return Ok(());
        }

        // highest rank, suits in bridge order
        let dealer = self
            .draws
            .iter()
            .map(|(seat, slot)| {
                let card = deck
                    .opened(*slot)
                    .and_then(Card::new)
                    .ok_or(HodlemError::BatchIncomplete)?;
                Ok(((card.rank(), Reverse(card.suit())), *seat))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .max()
            .map(|(_, seat)| seat)
            .ok_or(HodlemError::InvalidPlayers)?;

        self.dealer = Some(dealer);
        receipt.emit(Event::SelectDealer {
            table: self.id,
            seat: dealer,
        });
        info!(table = self.id, dealer, "dealer selected");
        self.start_hand(deck, block)
    }

    fn begin_showdown(&mut self, block: BlockNumber) -> Result<()> {
        let hand = self.hand.as_mut().ok_or(HodlemError::WrongPhase)?;
        self.showdown = hand.showdown_order();
        let first = self.showdown.first().copied();
        hand.set_turn(first);
        self.enter(Phase::Showdown, block + self.config.act_blocks);
        self.commit.turn = first;
        info!(table = self.id, order = ?self.showdown, "showdown");
        Ok(())
    }

    /// The seat on turn at showdown has shown or mucked.
    pub(crate) fn showdown_next(
        &mut self,
        deck: &mut DeckInstance,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        if !self.showdown.is_empty() {
            self.showdown.remove(0);
        }
        let holes = self.shown_holes(deck);
        let hand = self.hand.as_mut().ok_or(HodlemError::WrongPhase)?;

        let live = hand.live();
        if let [winner] = live[..] {
            let settlement = hand.settle_uncontested(winner);
            return self.finish_hand(settlement, deck, block, receipt);
        }
        match self.showdown.first().copied() {
            Some(next) => {
                hand.set_turn(Some(next));
                self.commit.turn = Some(next);
                self.commit.deadline = block + self.config.act_blocks;
                Ok(())
            }
            None => {
                let settlement = hand.settle_showdown(&holes);
                self.finish_hand(settlement, deck, block, receipt)
            }
        }
    }

    /// Hole cards opened so far, by seat.
    fn shown_holes(&self, deck: &DeckInstance) -> BTreeMap<SeatIndex, [Card; 2]> {
        self.holes
            .iter()
            .filter_map(|(seat, [a, b])| {
                let a = deck.opened(*a).and_then(Card::new)?;
                let b = deck.opened(*b).and_then(Card::new)?;
                Some((*seat, [a, b]))
            })
            .collect()
    }

    /// Best five of `seat`'s opened hole cards and the board.
    pub(crate) fn rank_of(&self, deck: &DeckInstance, seat: SeatIndex) -> Result<HandRank> {
        let holes = self.holes.get(&seat).ok_or(HodlemError::Unauthorised)?;
        let cards = holes
            .iter()
            .chain(&self.board)
            .map(|slot| deck.opened(*slot).and_then(Card::new))
            .collect::<Option<Vec<Card>>>()
            .ok_or(HodlemError::BatchIncomplete)?;
        Ok(best_hand(&cards))
    }

    /// Pay out the hand, retire busted seats, then either end the table or
    /// rotate the dealer and deal again.
    pub(crate) fn finish_hand(
        &mut self,
        settlement: Settlement,
        deck: &mut DeckInstance,
        block: BlockNumber,
        receipt: &mut Receipt,
    ) -> Result<()> {
        let hand = self.hand.take().ok_or(HodlemError::WrongPhase)?;
        for (seat, amount) in &settlement.awards {
            if *amount > 0 {
                receipt.emit(Event::CollectPot {
                    table: self.id,
                    seat: *seat,
                    amount: *amount,
                });
            }
        }
        for c in hand.contenders() {
            if let Some(seat) = self.seats.get_mut(c.seat).and_then(Option::as_mut) {
                seat.stack = c.stack - c.committed + settlement.received(c.seat);
            }
        }
        info!(table = self.id, pot = hand.pot(), "hand settled");

        self.deal = None;
        self.showdown.clear();
        self.eliminate_busted(receipt);

        if self.occupied().len() <= self.config.until_left {
            self.end_game(receipt);
            return Ok(());
        }
        self.dealer = self.next_occupied(hand.dealer());
        self.start_hand(deck, block)
    }
}
