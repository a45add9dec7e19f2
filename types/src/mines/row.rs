use serde::{Deserialize, Serialize};

use super::{ConfigError, BASE_MULTIPLIER, MAX_BOX_COUNT, MIN_BOX_COUNT};

/// Lifecycle of a single play-through
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundStatus {
    #[default]
    NotStarted,
    Playing,
    Won,
    Lost,
}

impl RoundStatus {
    /// Won and lost rounds only leave their state through a restart.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One step of the board: a box count with a single losing position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub box_count: u8,
    pub exploding_index: u8,
    /// Fair multiplier for this row after the house edge
    pub step_multiplier: f64,
    /// Running product up to and including this row, rounded to cents
    pub cumulative_multiplier: f64,
    pub completed: bool,
    pub exploded: bool,
    pub selected_index: Option<u8>,
}

impl Row {
    pub fn new(
        box_count: u8,
        exploding_index: u8,
        step_multiplier: f64,
        cumulative_multiplier: f64,
    ) -> Self {
        Self {
            box_count,
            exploding_index,
            step_multiplier,
            cumulative_multiplier,
            completed: false,
            exploded: false,
            selected_index: None,
        }
    }

    pub fn is_untouched(&self) -> bool {
        !self.completed && !self.exploded && self.selected_index.is_none()
    }

    /// Check a row dealt outside the generator, e.g. from a recording.
    pub fn validate(&self, position: usize) -> Result<(), ConfigError> {
        if self.box_count < MIN_BOX_COUNT {
            return Err(ConfigError::BoxCountTooSmall(self.box_count));
        }
        if self.box_count > MAX_BOX_COUNT {
            return Err(ConfigError::BoxCountTooLarge(self.box_count));
        }
        if self.exploding_index >= self.box_count {
            return Err(ConfigError::ExplodingIndexOutOfRange {
                row: position,
                index: self.exploding_index,
                box_count: self.box_count,
            });
        }
        Ok(())
    }
}

/// Ordered rows of one play-through plus the player's progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Identity used to discard unlock tickets from replaced rounds
    pub id: u64,
    pub rows: Vec<Row>,
    pub current_step: usize,
    pub current_multiplier: f64,
    pub status: RoundStatus,
    /// Wager locked in by the first click of the round
    pub stake: Option<f64>,
}

impl Round {
    pub fn new(id: u64, rows: Vec<Row>) -> Self {
        Self {
            id,
            rows,
            current_step: 0,
            current_multiplier: BASE_MULTIPLIER,
            status: RoundStatus::Playing,
            stake: None,
        }
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.rows.get(self.current_step)
    }

    /// Number of rows the player has safely passed.
    pub fn cleared(&self) -> usize {
        self.rows.iter().filter(|row| row.completed).count()
    }

    pub fn is_playing(&self) -> bool {
        self.status == RoundStatus::Playing
    }

    /// Amount the player would bank by cashing out now.
    pub fn cash_out_value(&self, bet: f64) -> f64 {
        let stake = self.stake.unwrap_or(bet);
        stake * self.current_multiplier
    }
}
