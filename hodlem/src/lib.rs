//! Dealerless Texas Hold'em.
//!
//! [`room::Room`] is the single entry point: it gates every call on the
//! table's phase and deadline, forwards cryptographic submissions to the
//! [`deck`] engine and betting decisions to the [`game`] engine, and moves
//! escrowed funds.

pub mod cards;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod game;
#[cfg(feature = "prover")]
pub mod prover;
pub mod room;
pub mod types;

pub use config::TableConfig;
pub use error::{HodlemError, Result};
pub use events::Event;
pub use room::Room;
pub use types::{Address, Context, Receipt, Transfer};
