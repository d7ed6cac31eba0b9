use crate::events::Event;

use serde::{Serialize, Serializer};
use std::fmt;

pub type TableId = u64;
pub type DeckId = u64;
pub type SeatIndex = usize;
pub type Amount = u64;
pub type BlockNumber = u64;

/// Account identifier on the settlement layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Burn sink: value sent here leaves circulation.
    pub const ZERO: Address = Address([0u8; 20]);
}

impl From<u64> for Address {
    fn from(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-call environment: who is calling, at which block, with how much value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    pub sender: Address,
    pub block: BlockNumber,
    pub value: Amount,
}

impl Context {
    pub fn new(sender: Address, block: BlockNumber) -> Self {
        Self {
            sender,
            block,
            value: 0,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub to: Address,
    pub amount: Amount,
}

/// Outcome of a successful call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub events: Vec<Event>,
    pub transfers: Vec<Transfer>,
}

impl Receipt {
    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn pay(&mut self, to: Address, amount: Amount) {
        if amount > 0 {
            self.transfers.push(Transfer { to, amount });
        }
    }

    /// Total value sent to `to` by this call.
    pub fn paid_to(&self, to: Address) -> Amount {
        self.transfers
            .iter()
            .filter(|t| t.to == to)
            .map(|t| t.amount)
            .sum()
    }
}
