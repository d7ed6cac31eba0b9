use crate::game::ranking::HandRank;
use crate::types::{Address, Amount, SeatIndex, TableId};

use serde::Serialize;

/// Everything a client needs to replay a table's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum Event {
    JoinTable {
        table: TableId,
        seat: SeatIndex,
        player: Address,
    },
    LeaveTable {
        table: TableId,
        seat: SeatIndex,
        player: Address,
        amount: Amount,
    },
    /// `revealed` is false for the commitment, true once the rows verified.
    DeckPrep {
        table: TableId,
        seat: SeatIndex,
        revealed: bool,
    },
    /// `verified` is false when the deck is submitted, true once its proof
    /// checks out.
    Shuffle {
        table: TableId,
        seat: SeatIndex,
        verified: bool,
    },
    /// Challenge bits for the shuffle just submitted, round `i` in bit `i`.
    Challenge {
        table: TableId,
        seat: SeatIndex,
        bits: u64,
    },
    SelectDealer {
        table: TableId,
        seat: SeatIndex,
    },
    /// 0 dealer draw, 1 hole cards, 2 flop, 3 turn, 4 river, 5 showdown.
    DealRound {
        table: TableId,
        street: u8,
    },
    /// `seat` is `None` for community cards.
    Show {
        table: TableId,
        seat: Option<SeatIndex>,
        card_index: usize,
        card_value: u8,
    },
    ShowHand {
        table: TableId,
        seat: SeatIndex,
        rank: HandRank,
    },
    Fold {
        table: TableId,
        seat: SeatIndex,
    },
    CallBet {
        table: TableId,
        seat: SeatIndex,
        amount: Amount,
    },
    RaiseBet {
        table: TableId,
        seat: SeatIndex,
        amount: Amount,
    },
    CollectPot {
        table: TableId,
        seat: SeatIndex,
        amount: Amount,
    },
    Eliminate {
        table: TableId,
        seat: SeatIndex,
        player: Address,
    },
    EndGame {
        table: TableId,
    },
}
