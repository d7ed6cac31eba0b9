//! Table lifecycle and escrow.
//!
//! Every entry point runs against a copy of the table and its deck and only
//! commits when the whole call succeeds, so a rejected submission leaves no
//! trace.

pub mod escrow;
mod flow;
pub mod table;
mod timeout;

pub use table::{DealStep, Phase, PhaseCommit, Seat, Table};

use crate::config::TableConfig;
use crate::deck::{DeckInstance, DeckStore, DecryptShare, Point, PrepRow, RevealProof, ShuffleProof};
use crate::error::{HodlemError, Result};
use crate::events::Event;
use crate::game::{Action, Progress};
use crate::types::{Address, Amount, Context, DeckId, Receipt, SeatIndex, TableId};

use hodlem_proofs::commitment::Commitment;
use hodlem_proofs::zkp::arguments::shuffle::Seed;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct Room {
    tables: BTreeMap<TableId, Table>,
    decks: DeckStore,
    next_table: TableId,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, id: TableId) -> Result<&Table> {
        self.tables.get(&id).ok_or(HodlemError::UnknownTable(id))
    }

    pub fn deck(&self, id: DeckId) -> Result<&DeckInstance> {
        self.decks.get(id)
    }

    /// Deck backing table `id`.
    pub fn table_deck(&self, id: TableId) -> Result<&DeckInstance> {
        self.decks.get(self.table(id)?.deck)
    }

    /// Allocate a standalone deck.
    pub fn new_deck(&mut self, players: usize) -> Result<DeckId> {
        self.decks.new_deck(players)
    }

    /// Value held in escrow across all tables.
    pub fn balance(&self) -> Amount {
        self.tables.values().map(Table::escrow).sum()
    }

    /// Run `f` against copies of table `id` and its deck, keeping the result
    /// only if it succeeds.
    fn transact<F>(&mut self, id: TableId, f: F) -> Result<Receipt>
    where
        F: FnOnce(&mut Table, &mut DeckInstance, &mut Receipt) -> Result<()>,
    {
        let mut table = self.table(id)?.clone();
        if table.phase() == Phase::Ended {
            return Err(HodlemError::WrongPhase);
        }
        let mut deck = self.decks.get(table.deck)?.clone();
        let mut receipt = Receipt::default();

        f(&mut table, &mut deck, &mut receipt)?;
        debug_assert!(table.escrow_balanced(), "escrow out of balance");

        self.decks.replace(deck);
        self.tables.insert(id, table);
        Ok(receipt)
    }

    pub fn create_table(
        &mut self,
        ctx: &Context,
        seat: SeatIndex,
        config: TableConfig,
        game: Address,
    ) -> Result<(TableId, Receipt)> {
        config.validate(seat)?;
        let deposit = config.deposit()?;
        if ctx.value != deposit {
            return Err(HodlemError::IncorrectValue);
        }

        let deck = self.decks.new_deck(config.starts_with)?;
        let id = self.next_table;
        self.next_table += 1;

        let mut table = Table::new(id, config, game, deck);
        table.take_seat(seat, ctx.sender, deposit);
        let mut receipt = Receipt::default();
        receipt.emit(Event::JoinTable {
            table: id,
            seat,
            player: ctx.sender,
        });
        info!(table = id, deck, seat, player = %ctx.sender, "table created");
        self.tables.insert(id, table);
        Ok((id, receipt))
    }

    pub fn join_table(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.transact(table, |t, _, receipt| {
            t.expect_phase(Phase::Join)?;
            match t.seats.get(seat) {
                None => return Err(HodlemError::InvalidSeatIndex),
                Some(Some(_)) => return Err(HodlemError::SeatTaken),
                Some(None) => {}
            }
            if t.seats.iter().flatten().any(|s| s.player == ctx.sender) {
                return Err(HodlemError::AlreadySeated);
            }
            let deposit = t.config.deposit()?;
            if ctx.value != deposit {
                return Err(HodlemError::IncorrectValue);
            }

            t.take_seat(seat, ctx.sender, deposit);
            receipt.emit(Event::JoinTable {
                table: t.id,
                seat,
                player: ctx.sender,
            });
            info!(table = t.id, seat, player = %ctx.sender, "joined");

            if t.is_full() {
                t.enter(Phase::Prep, ctx.block + t.config.prep_blocks);
                info!(table = t.id, "table full, preparing deck");
            }
            Ok(())
        })
    }

    pub fn leave_table(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.transact(table, |t, _, receipt| {
            t.expect_phase(Phase::Join)?;
            t.expect_player(seat, ctx.sender)?;
            t.refund(seat, receipt);
            info!(table = t.id, seat, "left");
            Ok(())
        })
    }

    /// Close the table early, refunding every seat. Only the table's game
    /// address may do this.
    pub fn delete_table(&mut self, ctx: &Context, table: TableId) -> Result<Receipt> {
        self.transact(table, |t, _, receipt| {
            if ctx.sender != t.game {
                return Err(HodlemError::Unauthorised);
            }
            t.end_game(receipt);
            Ok(())
        })
    }

    pub fn submit_prep(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        commitment: Commitment,
    ) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Prep)?;
            t.expect_player(seat, ctx.sender)?;
            deck.submit_prep(seat, commitment)?;
            t.commit.mark(seat);
            receipt.emit(Event::DeckPrep {
                table: t.id,
                seat,
                revealed: false,
            });
            if deck.all_committed() {
                // reveals get a fresh window
                t.commit.deadline = ctx.block + t.config.prep_blocks;
                debug!(table = t.id, "prep commitments complete");
            }
            Ok(())
        })
    }

    pub fn verify_prep(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        rows: &[PrepRow],
    ) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Prep)?;
            t.expect_player(seat, ctx.sender)?;
            if !deck.all_committed() {
                return Err(HodlemError::CommitmentsPending);
            }
            let done = deck.verify_prep(seat, rows)?;
            receipt.emit(Event::DeckPrep {
                table: t.id,
                seat,
                revealed: true,
            });
            if done {
                t.begin_play(deck, ctx.block)?;
            }
            Ok(())
        })
    }

    /// Submit `seat`'s re-encrypted deck. The receipt carries the
    /// challenge bits its shuffle proof must answer.
    pub fn submit_shuffle(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        shuffled: Vec<Point>,
        seed: Seed,
    ) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Shuffle)?;
            t.expect_player(seat, ctx.sender)?;
            if t.commit.has(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            if t.commit.turn != Some(seat) {
                return Err(HodlemError::WrongTurn);
            }
            let bits = deck.submit_shuffle(seat, shuffled, seed)?;
            receipt.emit(Event::Shuffle {
                table: t.id,
                seat,
                verified: false,
            });
            receipt.emit(Event::Challenge {
                table: t.id,
                seat,
                bits,
            });
            t.shuffle_submitted(deck, seat, ctx.block);
            Ok(())
        })
    }

    pub fn verify_shuffle(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        proof: &ShuffleProof,
    ) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Verify)?;
            t.expect_player(seat, ctx.sender)?;
            let ready = deck.verify_shuffle(seat, proof)?;
            t.commit.mark(seat);
            receipt.emit(Event::Shuffle {
                table: t.id,
                seat,
                verified: true,
            });
            if ready {
                t.shuffles_verified(deck, ctx.block, receipt)?;
            }
            Ok(())
        })
    }

    /// Strip `seat`'s key from cards of the current dealing step. `is_last`
    /// closes the seat's batch for the step; it fails while the seat still
    /// owes shares.
    pub fn decrypt_cards(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        shares: &[DecryptShare],
        is_last: bool,
    ) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Deal)?;
            t.expect_player(seat, ctx.sender)?;
            if t.commit.has(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            let step = t.deal.clone().ok_or(HodlemError::WrongPhase)?;
            if let Some(stray) = shares.iter().find(|s| !step.slots.contains(&s.index)) {
                return Err(HodlemError::InvalidCardIndex(stray.index));
            }

            for (index, value) in deck.decrypt_cards(seat, shares)? {
                receipt.emit(Event::Show {
                    table: t.id,
                    seat: None,
                    card_index: index,
                    card_value: value,
                });
            }
            if !is_last {
                return Ok(());
            }

            if step.slots.iter().any(|slot| deck.owes_share(seat, *slot)) {
                return Err(HodlemError::BatchIncomplete);
            }
            t.commit.mark(seat);
            let everyone = deck
                .hand()
                .map_or(false, |h| h.order().iter().all(|s| t.commit.has(*s)));
            if everyone {
                t.close_deal_step(deck, ctx.block, receipt)?;
            }
            Ok(())
        })
    }

    /// Open `seat`'s hole cards at showdown, or its card in the dealer draw.
    /// With `is_last` the seat is done: a showdown hand is ranked, and either
    /// way the turn passes on.
    pub fn reveal_cards(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        proofs: &[RevealProof],
        is_last: bool,
    ) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            let phase = t.phase();
            if phase != Phase::Showdown && phase != Phase::Draw {
                return Err(HodlemError::WrongPhase);
            }
            t.expect_player(seat, ctx.sender)?;
            if t.commit.turn != Some(seat) {
                return Err(HodlemError::WrongTurn);
            }
            let own: Vec<usize> = match phase {
                Phase::Draw => t.draw_slot(seat).into_iter().collect(),
                _ => t.hole_slots(seat).map(Vec::from).unwrap_or_default(),
            };
            if own.is_empty() {
                return Err(HodlemError::Unauthorised);
            }
            if let Some(stray) = proofs.iter().find(|p| !own.contains(&p.index)) {
                return Err(HodlemError::InvalidCardIndex(stray.index));
            }

            for (index, value) in deck.reveal_cards(seat, proofs)? {
                receipt.emit(Event::Show {
                    table: t.id,
                    seat: Some(seat),
                    card_index: index,
                    card_value: value,
                });
            }
            if !is_last {
                return Ok(());
            }

            if phase == Phase::Draw {
                if own.iter().any(|slot| deck.opened(*slot).is_none()) {
                    return Err(HodlemError::BatchIncomplete);
                }
                return t.draw_shown(deck, seat, ctx.block, receipt);
            }
            let rank = t.rank_of(deck, seat)?;
            if let Some(hand) = t.hand.as_mut() {
                hand.record_show(seat, rank);
            }
            receipt.emit(Event::ShowHand {
                table: t.id,
                seat,
                rank,
            });
            info!(table = t.id, seat, %rank, "hand shown");
            t.showdown_next(deck, ctx.block, receipt)
        })
    }

    /// Reveal every card `seat` has to open in one call.
    pub fn show_cards(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        proofs: &[RevealProof],
    ) -> Result<Receipt> {
        self.reveal_cards(ctx, table, seat, proofs, true)
    }

    /// Muck at showdown.
    pub fn fold_cards(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Showdown)?;
            t.expect_player(seat, ctx.sender)?;
            if t.commit.turn != Some(seat) {
                return Err(HodlemError::WrongTurn);
            }
            if let Some(hand) = t.hand.as_mut() {
                hand.muck(seat);
            }
            receipt.emit(Event::Fold { table: t.id, seat });
            t.showdown_next(deck, ctx.block, receipt)
        })
    }

    pub fn fold(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.act(ctx, table, seat, Action::Fold)
    }

    /// Check, or call as much of the bet as the stack allows.
    pub fn call_bet(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.act(ctx, table, seat, Action::Call)
    }

    /// Put `size` more chips in this turn. `size` includes the amount
    /// needed to call, so the raise itself is whatever exceeds it.
    pub fn raise_bet(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        size: Amount,
    ) -> Result<Receipt> {
        self.act(ctx, table, seat, Action::Raise(size))
    }

    fn act(&mut self, ctx: &Context, table: TableId, seat: SeatIndex, action: Action) -> Result<Receipt> {
        self.transact(table, |t, deck, receipt| {
            t.expect_phase(Phase::Act)?;
            t.expect_player(seat, ctx.sender)?;
            let hand = t.hand.as_mut().ok_or(HodlemError::WrongPhase)?;
            let (events, progress) = hand.apply(seat, action)?;
            for event in events {
                receipt.emit(event);
            }
            match progress {
                Progress::Turn(next) => {
                    t.commit.turn = Some(next);
                    t.commit.deadline = ctx.block + t.config.act_blocks;
                    Ok(())
                }
                Progress::StreetClosed => t.street_closed(deck, ctx.block, receipt),
                Progress::HandOver(winner) => {
                    let settlement = hand.settle_uncontested(winner);
                    t.finish_hand(settlement, deck, ctx.block, receipt)
                }
            }
        })
    }
}
