//! Betting and showdown: turn order, bets, pots and hand strength.

pub mod hand;
pub mod pot;
pub mod ranking;

pub use hand::{Action, Hand, Progress};
pub use pot::{Pot, Settlement};
pub use ranking::{Category, HandRank};
