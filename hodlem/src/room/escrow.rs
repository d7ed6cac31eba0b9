use super::table::{Phase, Seat, Table};
use crate::events::Event;
use crate::types::{Address, Amount, Receipt, SeatIndex};

use tracing::{info, warn};

/// How a forfeited amount is shared out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forfeit {
    pub burned: Amount,
    /// Added to each remaining seat's stack.
    pub share: Amount,
}

/// Burn `burn_percent` of `amount` and split the rest evenly between
/// `recipients` seats; whatever does not divide evenly is burned too.
pub fn split_forfeit(amount: Amount, burn_percent: u8, recipients: usize) -> Forfeit {
    let burn = (u128::from(amount) * u128::from(burn_percent.min(100)) / 100) as Amount;
    let rest = amount - burn;
    if recipients == 0 {
        return Forfeit {
            burned: amount,
            share: 0,
        };
    }
    let share = rest / recipients as Amount;
    Forfeit {
        burned: amount - share * recipients as Amount,
        share,
    }
}

impl Table {
    pub(crate) fn take_seat(&mut self, seat: SeatIndex, player: Address, deposit: Amount) {
        self.seats[seat] = Some(Seat {
            player,
            bond: self.config.bond,
            stack: self.config.buy_in,
        });
        self.escrow += deposit;
    }

    /// Empty `seat`, paying `amount` of its funds to its player.
    fn release(&mut self, seat: SeatIndex, amount: Amount, receipt: &mut Receipt) -> Option<Seat> {
        let occupant = self.seats.get_mut(seat)?.take()?;
        self.escrow -= occupant.bond + occupant.stack;
        receipt.pay(occupant.player, amount);
        Some(occupant)
    }

    /// Refund bond and stack to a seat that walks away.
    pub(crate) fn refund(&mut self, seat: SeatIndex, receipt: &mut Receipt) {
        let Some(amount) = self.seat(seat).map(|s| s.bond + s.stack) else {
            return;
        };
        if let Some(occupant) = self.release(seat, amount, receipt) {
            receipt.emit(Event::LeaveTable {
                table: self.id,
                seat,
                player: occupant.player,
                amount,
            });
        }
    }

    /// Seats with nothing left to play get their bond back.
    pub(crate) fn eliminate_busted(&mut self, receipt: &mut Receipt) {
        let busted: Vec<SeatIndex> = self
            .seats
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Some(seat) if seat.stack == 0))
            .map(|(i, _)| i)
            .collect();
        for seat in busted {
            let bond = self.seat(seat).map_or(0, |s| s.bond);
            if let Some(occupant) = self.release(seat, bond, receipt) {
                info!(table = self.id, seat, player = %occupant.player, "eliminated");
                receipt.emit(Event::Eliminate {
                    table: self.id,
                    seat,
                    player: occupant.player,
                });
            }
        }
    }

    /// Vacate `offender` and share its bond and stack between the seats that
    /// remain.
    pub(crate) fn forfeit(&mut self, offender: SeatIndex, receipt: &mut Receipt) {
        let Some(occupant) = self.seats.get_mut(offender).and_then(Option::take) else {
            return;
        };
        let amount = occupant.bond + occupant.stack;
        let remaining = self.occupied();
        let split = split_forfeit(amount, self.config.forfeit_burn_percent, remaining.len());

        for seat in &remaining {
            if let Some(s) = self.seats[*seat].as_mut() {
                s.stack += split.share;
            }
        }
        self.escrow -= split.burned;
        receipt.pay(Address::ZERO, split.burned);

        warn!(
            table = self.id,
            seat = offender,
            player = %occupant.player,
            amount,
            burned = split.burned,
            "seat forfeited"
        );
        receipt.emit(Event::Eliminate {
            table: self.id,
            seat: offender,
            player: occupant.player,
        });
    }

    /// Refund every seat and close the table for good.
    pub(crate) fn end_game(&mut self, receipt: &mut Receipt) {
        for seat in self.occupied() {
            self.refund(seat, receipt);
        }
        self.hand = None;
        self.deal = None;
        self.showdown.clear();
        self.enter(Phase::Ended, 0);
        receipt.emit(Event::EndGame { table: self.id });
        info!(table = self.id, "game over");
    }
}

#[cfg(test)]
mod test {
    use super::split_forfeit;

    #[test]
    fn forfeit_goes_to_remaining_seats() {
        let split = split_forfeit(800, 0, 1);
        assert_eq!(split.share, 800);
        assert_eq!(split.burned, 0);
    }

    #[test]
    fn uneven_forfeit_burns_the_remainder() {
        let split = split_forfeit(800, 10, 3);
        // 80 burned, 720 / 3
        assert_eq!(split.share, 240);
        assert_eq!(split.burned, 80);

        let split = split_forfeit(100, 0, 3);
        assert_eq!(split.share, 33);
        assert_eq!(split.burned, 1);
    }

    #[test]
    fn nobody_left_burns_everything() {
        let split = split_forfeit(500, 0, 0);
        assert_eq!(split.share, 0);
        assert_eq!(split.burned, 500);
    }
}
