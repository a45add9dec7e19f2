use serde::{Deserialize, Serialize};

use super::{Row, RoundStatus};

/// Token that makes the next row interactive once the presentation delay
/// has elapsed. Only valid for the round and step that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnlockTicket {
    pub round_id: u64,
    pub step: usize,
}

/// Money moved by a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    /// Net profit credited to `total_won`
    Won { credited: f64 },
    /// Stake, or a cash-out shortfall below 1.0x, added to `total_lost`
    Lost { debited: f64 },
}

/// Result of a box click.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundDelta {
    pub round_id: u64,
    pub row_index: usize,
    pub row: Row,
    pub status: RoundStatus,
    pub current_step: usize,
    pub current_multiplier: f64,
    pub unlock: Option<UnlockTicket>,
    pub settlement: Option<Settlement>,
}

/// Result of a cash out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionDelta {
    /// Round that was cashed out
    pub round_id: u64,
    /// Status of the session's round after the action
    pub status: RoundStatus,
    /// Profit added to `total_won`
    pub credited: f64,
    /// Shortfall added to `total_lost` when the multiplier was below 1.0x
    pub debited: f64,
    pub total_won: f64,
    pub total_lost: f64,
}

/// Running totals across rounds. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub total_won: f64,
    pub total_lost: f64,
    pub rounds_won: u64,
    pub rounds_lost: u64,
}

impl Tally {
    pub fn net(&self) -> f64 {
        self.total_won - self.total_lost
    }

    pub fn rounds_settled(&self) -> u64 {
        self.rounds_won + self.rounds_lost
    }
}
