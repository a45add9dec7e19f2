use thiserror::Error;

use super::{RoundStatus, INVALID_BET_MESSAGE, MAX_BOX_COUNT, MIN_BOX_COUNT};

/// Errors surfaced to the presentation layer by session actions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Bet unset, NaN, infinite or not positive. Blocks the action.
    #[error("{msg}", msg = INVALID_BET_MESSAGE)]
    InvalidBetAmount,
    /// Action not allowed in the current state. Safe to ignore.
    #[error("invalid game action: {0}")]
    InvalidGameAction(#[from] InvalidAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("round is {0:?}, not playing")]
    NotPlaying(RoundStatus),
    #[error("row {got} is not the current row {expected}")]
    WrongRow { expected: usize, got: usize },
    #[error("box {index} is outside a row of {box_count}")]
    BoxOutOfRange { index: usize, box_count: u8 },
    #[error("row {0} is not interactive yet")]
    RowLocked(usize),
    #[error("no rows cleared yet")]
    NothingToCashOut,
}

/// Invalid variant or runtime configuration. Raised before any round is dealt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("box count {0} is below the minimum of {min}", min = MIN_BOX_COUNT)]
    BoxCountTooSmall(u8),
    #[error("box count {0} exceeds the maximum of {max}", max = MAX_BOX_COUNT)]
    BoxCountTooLarge(u8),
    #[error("empty box range {min}..={max}")]
    EmptyRange { min: u8, max: u8 },
    #[error("distribution yields {got} rows, expected {expected}")]
    RowCount { expected: usize, got: usize },
    #[error("{field} house edge must be in [0, 1) (got {value})")]
    EdgeOutOfRange { field: &'static str, value: f64 },
    #[error("unknown variant preset: {0}")]
    UnknownPreset(String),
    #[error("board has no rows")]
    EmptyBoard,
    #[error("row {row} explodes at box {index} but has {box_count} boxes")]
    ExplodingIndexOutOfRange { row: usize, index: u8, box_count: u8 },
}

/// Failure of a batch of simulated rounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
}
