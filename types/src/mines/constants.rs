/// Number of rows on every board
pub const ROW_COUNT: usize = 25;

/// Smallest box count a row may carry (one safe box, one exploding box)
pub const MIN_BOX_COUNT: u8 = 2;

/// Largest box count any distribution may produce
pub const MAX_BOX_COUNT: u8 = 16;

/// Presentation delay before the next row becomes interactive
pub const ADVANCE_DELAY_MS: u64 = 300;

/// Multiplier a round starts from
pub const BASE_MULTIPLIER: f64 = 1.0;

/// Validation message surfaced when a wager is attempted without a usable bet
pub const INVALID_BET_MESSAGE: &str = "Please enter a valid bet amount!";

/// Default row split for the classic distribution
pub const CLASSIC_SMALL_ROWS: usize = 15;
pub const CLASSIC_LARGE_ROWS: usize = 10;

/// Repetitions of each box count in the multiset distribution
pub const MULTISET_REPEAT: usize = 5;
