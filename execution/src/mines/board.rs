//! Board state machine.
//!
//! `not-started -> playing -> {won | lost}`. Transitions here only touch the
//! round; money moves in the session.

use clave_types::mines::{InvalidAction, Round, RoundStatus};

/// Outcome of a click that was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
    /// Exploding box hit; the round is lost.
    Exploded,
    /// Safe box; `finished` is set when the last row was cleared.
    Cleared { finished: bool },
}

/// Check a click against the round without mutating it.
pub fn validate_click(
    round: &Round,
    row_index: usize,
    box_index: usize,
) -> Result<(), InvalidAction> {
    if !round.is_playing() {
        return Err(InvalidAction::NotPlaying(round.status));
    }
    let row = match round.current_row() {
        Some(row) if row_index == round.current_step => row,
        _ => {
            return Err(InvalidAction::WrongRow {
                expected: round.current_step,
                got: row_index,
            })
        }
    };
    if box_index >= row.box_count as usize {
        return Err(InvalidAction::BoxOutOfRange {
            index: box_index,
            box_count: row.box_count,
        });
    }
    Ok(())
}

/// Apply a click at the current row. The first accepted click locks `stake`
/// into the round.
pub fn click(
    round: &mut Round,
    row_index: usize,
    box_index: usize,
    stake: f64,
) -> Result<Click, InvalidAction> {
    validate_click(round, row_index, box_index)?;
    round.stake.get_or_insert(stake);

    let step = round.current_step;
    let row = &mut round.rows[step];
    // Bounded by the row's box count above
    row.selected_index = Some(box_index as u8);

    if box_index == row.exploding_index as usize {
        row.exploded = true;
        round.status = RoundStatus::Lost;
        round.current_multiplier = 0.0;
        return Ok(Click::Exploded);
    }

    row.completed = true;
    round.current_multiplier = row.cumulative_multiplier;
    round.current_step += 1;

    let finished = round.current_step == round.rows.len();
    if finished {
        round.status = RoundStatus::Won;
    }
    Ok(Click::Cleared { finished })
}

/// End a round early at the current multiplier. Returns the multiplier banked.
pub fn cash_out(round: &mut Round) -> Result<f64, InvalidAction> {
    if !round.is_playing() {
        return Err(InvalidAction::NotPlaying(round.status));
    }
    if round.current_step == 0 {
        return Err(InvalidAction::NothingToCashOut);
    }
    round.status = RoundStatus::Won;
    Ok(round.current_multiplier)
}
