use crate::cards::CARDS;
use crate::error::{HodlemError, Result};
use crate::types::{Amount, BlockNumber, SeatIndex};

use hodlem_proofs::zkp::arguments::shuffle::MAX_ROUNDS;
use serde::{Deserialize, Serialize};

/// Most seats a table can deal: two hole cards each plus five on the board.
pub const MAX_SEATS: usize = (CARDS - 5) / 2;

/// Immutable table parameters, fixed at creation.
///
/// Keys follow the camelCase names used by table clients, e.g.
///
/// ```json
/// { "buyIn": 300, "bond": 500, "startsWith": 2, "untilLeft": 1,
///   "structure": [10, 20, 30, 40], "levelBlocks": 20, "verifRounds": 4,
///   "prepBlocks": 10, "shuffBlocks": 10, "verifBlocks": 15,
///   "dealBlocks": 10, "actBlocks": 15 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub buy_in: Amount,
    pub bond: Amount,
    pub starts_with: usize,
    pub until_left: usize,
    /// Small blind per level; the big blind is twice the small blind.
    pub structure: Vec<Amount>,
    pub level_blocks: BlockNumber,
    /// Cut-and-choose rounds each shuffle proof must pass.
    pub verif_rounds: usize,
    pub prep_blocks: BlockNumber,
    pub shuff_blocks: BlockNumber,
    pub verif_blocks: BlockNumber,
    pub deal_blocks: BlockNumber,
    pub act_blocks: BlockNumber,
    /// Share of forfeited funds that is burned rather than paid to the
    /// remaining seats.
    #[serde(default)]
    pub forfeit_burn_percent: u8,
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Value a player must attach to take a seat.
    pub fn deposit(&self) -> Result<Amount> {
        self.bond
            .checked_add(self.buy_in)
            .ok_or(HodlemError::InvalidConfig("bond + buyIn overflows"))
    }

    /// Check the configuration for a creator taking `seat`.
    pub fn validate(&self, seat: SeatIndex) -> Result<()> {
        if seat >= self.starts_with {
            return Err(HodlemError::InvalidSeatIndex);
        }
        if self.starts_with < 2 || self.starts_with > MAX_SEATS {
            return Err(HodlemError::InvalidStartsWith);
        }
        if self.until_left == 0 || self.until_left >= self.starts_with {
            return Err(HodlemError::InvalidUntilLeft);
        }
        if self.structure.is_empty() || self.structure.contains(&0) {
            return Err(HodlemError::InvalidConfig("structure"));
        }
        if self.structure.iter().any(|sb| sb.checked_mul(2).is_none()) {
            return Err(HodlemError::InvalidConfig("structure"));
        }
        if self.level_blocks == 0 {
            return Err(HodlemError::InvalidConfig("levelBlocks"));
        }
        if self.verif_rounds == 0 || self.verif_rounds > MAX_ROUNDS {
            return Err(HodlemError::InvalidConfig("verifRounds"));
        }
        let deadlines = [
            self.prep_blocks,
            self.shuff_blocks,
            self.verif_blocks,
            self.deal_blocks,
            self.act_blocks,
        ];
        if deadlines.contains(&0) {
            return Err(HodlemError::InvalidConfig("phase blocks"));
        }
        if self.forfeit_burn_percent > 100 {
            return Err(HodlemError::InvalidConfig("forfeitBurnPercent"));
        }
        self.deposit()?;
        Ok(())
    }

    /// Small blind at `level`; levels past the end of the structure stay on
    /// the last entry.
    pub fn small_blind(&self, level: u64) -> Amount {
        let last = self.structure.len().saturating_sub(1);
        let index = usize::try_from(level).map_or(last, |l| l.min(last));
        self.structure.get(index).copied().unwrap_or_default()
    }
}
