//! Deadline enforcement. Any account may blame a seat once the active
//! phase's deadline has passed and the seat still owes its submission.

use super::table::{Phase, Table};
use super::Room;
use crate::deck::DeckInstance;
use crate::error::{HodlemError, Result};
use crate::types::{Context, Receipt, SeatIndex, TableId};

use tracing::warn;

impl Room {
    pub fn submit_prep_timeout(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.adjudicate(ctx, table, seat, &[Phase::Prep], |_, deck| {
            if deck.prep_committed(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            Ok(())
        })
    }

    pub fn verify_prep_timeout(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.adjudicate(ctx, table, seat, &[Phase::Prep], |_, deck| {
            if !deck.prep_committed(seat) {
                return Err(HodlemError::NotSubmitted);
            }
            if !deck.all_committed() {
                return Err(HodlemError::CommitmentsPending);
            }
            if deck.prep_revealed(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            Ok(())
        })
    }

    pub fn submit_shuffle_timeout(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.adjudicate(ctx, table, seat, &[Phase::Shuffle], |t, _| {
            if t.commit.has(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            if t.commit.turn != Some(seat) {
                return Err(HodlemError::WrongTurn);
            }
            Ok(())
        })
    }

    pub fn verify_shuffle_timeout(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.adjudicate(ctx, table, seat, &[Phase::Verify], |_, deck| {
            if deck.shuffle_verified(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            Ok(())
        })
    }

    pub fn deal_timeout(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        self.adjudicate(ctx, table, seat, &[Phase::Deal], |t, deck| {
            if deck.hand().and_then(|h| h.position(seat)).is_none() {
                return Err(HodlemError::Unauthorised);
            }
            if t.commit.has(seat) {
                return Err(HodlemError::AlreadySubmitted);
            }
            Ok(())
        })
    }

    /// Blame the seat on turn during betting, showdown or the dealer draw.
    pub fn act_timeout(&mut self, ctx: &Context, table: TableId, seat: SeatIndex) -> Result<Receipt> {
        let phases = [Phase::Act, Phase::Showdown, Phase::Draw];
        self.adjudicate(ctx, table, seat, &phases, |t, _| {
            if t.commit.turn != Some(seat) {
                return Err(HodlemError::WrongTurn);
            }
            Ok(())
        })
    }

    /// Forfeit `seat` if it owes a submission in one of `phases` past the
    /// deadline, then carry on with whoever is left.
    fn adjudicate<F>(
        &mut self,
        ctx: &Context,
        table: TableId,
        seat: SeatIndex,
        phases: &[Phase],
        owes: F,
    ) -> Result<Receipt>
    where
        F: FnOnce(&Table, &DeckInstance) -> Result<()>,
    {
        self.transact(table, |t, deck, receipt| {
            let phase = t.phase();
            if !phases.contains(&phase) {
                return Err(HodlemError::WrongPhase);
            }
            t.expect_occupied(seat)?;
            owes(t, deck)?;
            if ctx.block <= t.commit.deadline {
                return Err(HodlemError::DeadlineNotPassed);
            }

            warn!(table = t.id, seat, ?phase, caller = %ctx.sender, "timeout");
            t.forfeit(seat, receipt);
            t.hand = None;

            if phase == Phase::Prep || t.occupied().len() <= t.config.until_left {
                t.end_game(receipt);
                return Ok(());
            }
            match t.dealer {
                None => t.start_draw(deck, ctx.block),
                Some(dealer) => {
                    if t.seat(dealer).is_none() {
                        t.dealer = t.next_occupied(dealer);
                    }
                    t.start_hand(deck, ctx.block)
                }
            }
        })
    }
}
