//! Payout model.
//!
//! A row with `n` boxes is survived with probability `(n - 1) / n`, so its
//! fair multiplier is `n / (n - 1)`. The house edge shaves a fraction off the
//! fair multiplier; the edge depends only on the box count and, for cushioned
//! tables, on the row position. Randomness never enters this module.

use clave_types::mines::{Accumulation, EdgeTable, EdgeTiers, Row, BASE_MULTIPLIER};

/// Deterministic house edge lookup.
pub trait EdgeSchedule {
    /// House edge in `[0, 1)` for a row of `box_count` boxes at `position`
    /// on a board of `row_count` rows.
    fn house_edge(&self, box_count: u8, position: usize, row_count: usize) -> f64;
}

impl EdgeSchedule for EdgeTiers {
    fn house_edge(&self, box_count: u8, _position: usize, _row_count: usize) -> f64 {
        match box_count {
            0..=2 => self.pair,
            3 | 4 => self.small,
            _ => self.large,
        }
    }
}

impl EdgeSchedule for EdgeTable {
    fn house_edge(&self, box_count: u8, position: usize, row_count: usize) -> f64 {
        match self {
            Self::Tiered { tiers } => tiers.house_edge(box_count, position, row_count),
            Self::Cushioned { head, tail, tiers } => {
                if position < *head || position + tail >= row_count {
                    0.0
                } else {
                    tiers.house_edge(box_count, position, row_count)
                }
            }
        }
    }
}

/// Probability of picking a safe box.
pub fn win_probability(box_count: u8) -> f64 {
    let n = box_count as f64;
    (n - 1.0) / n
}

/// Multiplier that makes a single row a zero-edge bet.
pub fn fair_multiplier(box_count: u8) -> f64 {
    1.0 / win_probability(box_count)
}

pub fn step_multiplier(box_count: u8, house_edge: f64) -> f64 {
    fair_multiplier(box_count) * (1.0 - house_edge)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Apply one step to the running product.
///
/// Returns the value stored on the row and the base carried to the next row.
/// Under [Accumulation::Rounded] the two are the same, so rounding error
/// compounds from row to row.
pub fn accumulate(previous: f64, step: f64, accumulation: Accumulation) -> (f64, f64) {
    let product = previous * step;
    let stored = round2(product);
    match accumulation {
        Accumulation::Rounded => (stored, stored),
        Accumulation::Exact => (stored, product),
    }
}

/// Cumulative multipliers for a sequence of step multipliers.
pub fn cumulative_multipliers(steps: &[f64], accumulation: Accumulation) -> Vec<f64> {
    let mut carry = BASE_MULTIPLIER;
    steps
        .iter()
        .map(|&step| {
            let (stored, next) = accumulate(carry, step, accumulation);
            carry = next;
            stored
        })
        .collect()
}

/// Lowest cumulative multiplier anywhere on the board.
///
/// A value below 1.0 means a player can clear rows and still bank less than
/// the stake.
pub fn lowest_prefix_multiplier(rows: &[Row]) -> f64 {
    rows.iter()
        .map(|row| row.cumulative_multiplier)
        .reduce(f64::min)
        .unwrap_or(BASE_MULTIPLIER)
}

/// Net profit of banking `stake` at `multiplier`, rounded to cents.
pub fn winnings(stake: f64, multiplier: f64) -> f64 {
    round2(stake * multiplier - stake)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_two_box_zero_edge_is_exactly_double() {
        assert_eq!(fair_multiplier(2), 2.0);
        assert_eq!(step_multiplier(2, 0.0), 2.0);
        assert_eq!(round2(step_multiplier(2, 0.0)), 2.00);
    }

    #[test]
    fn test_fair_multipliers() {
        assert!((fair_multiplier(3) - 1.5).abs() < TOLERANCE);
        assert!((fair_multiplier(4) - 4.0 / 3.0).abs() < TOLERANCE);
        assert!((fair_multiplier(7) - 7.0 / 6.0).abs() < TOLERANCE);
        assert!((win_probability(5) - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn test_tiers() {
        let tiers = EdgeTiers::new(0.0, 0.05, 0.10);
        assert_eq!(tiers.house_edge(2, 0, 25), 0.0);
        assert_eq!(tiers.house_edge(3, 0, 25), 0.05);
        assert_eq!(tiers.house_edge(4, 0, 25), 0.05);
        assert_eq!(tiers.house_edge(5, 0, 25), 0.10);
        assert_eq!(tiers.house_edge(7, 0, 25), 0.10);
        assert!((step_multiplier(3, 0.05) - 1.425).abs() < TOLERANCE);
    }

    #[test]
    fn test_cushioned_positions() {
        let table = EdgeTable::Cushioned {
            head: 3,
            tail: 3,
            tiers: EdgeTiers::new(0.0, 0.05, 0.18),
        };
        for position in 0..3 {
            assert_eq!(table.house_edge(7, position, 25), 0.0);
        }
        for position in 3..22 {
            assert_eq!(table.house_edge(7, position, 25), 0.18);
            assert_eq!(table.house_edge(4, position, 25), 0.05);
        }
        for position in 22..25 {
            assert_eq!(table.house_edge(7, position, 25), 0.0);
        }
    }

    #[test]
    fn test_edge_is_deterministic() {
        let table = EdgeTable::Tiered {
            tiers: EdgeTiers::new(0.0, 0.05, 0.12),
        };
        for box_count in 2..=7 {
            assert_eq!(
                table.house_edge(box_count, 4, 25),
                table.house_edge(box_count, 4, 25)
            );
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.426), 1.43);
        assert_eq!(round2(4.0 / 3.0), 1.33);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(3.000000000000002), 3.0);
    }

    #[test]
    fn test_rounded_accumulation_compounds() {
        // 4/3 stores as 1.33; the next row multiplies the stored value.
        let steps = [4.0 / 3.0, 4.0 / 3.0];
        let rounded = cumulative_multipliers(&steps, Accumulation::Rounded);
        let exact = cumulative_multipliers(&steps, Accumulation::Exact);

        assert_eq!(rounded[0], 1.33);
        assert_eq!(exact[0], 1.33);
        // round2(1.33 * 4/3) = round2(1.7733) = 1.77
        assert_eq!(rounded[1], 1.77);
        // round2(16/9) = round2(1.7778) = 1.78
        assert_eq!(exact[1], 1.78);
    }

    #[test]
    fn test_lowest_prefix_multiplier_empty_board() {
        assert_eq!(lowest_prefix_multiplier(&[]), BASE_MULTIPLIER);
    }

    #[test]
    fn test_lowest_prefix_multiplier() {
        let rows = vec![
            Row::new(7, 0, 1.17, 1.17),
            Row::new(7, 0, 0.96, 1.12),
            Row::new(2, 0, 2.0, 2.24),
        ];
        assert_eq!(lowest_prefix_multiplier(&rows), 1.12);
    }

    #[test]
    fn test_winnings() {
        assert_eq!(winnings(10.0, 1.30), 3.0);
        assert_eq!(winnings(10.0, 1.0), 0.0);
        assert_eq!(winnings(25.0, 2.0), 25.0);
    }
}
