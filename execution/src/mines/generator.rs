//! Round generator.
//!
//! Boards are dealt in three passes: draw the box counts, shuffle them with
//! Fisher-Yates, then walk the rows in order drawing each exploding box and
//! compounding the multiplier.

use super::payout::{accumulate, step_multiplier, EdgeSchedule};
use super::GameRng;
use clave_types::mines::{
    Accumulation, BoxCounts, Round, Row, Variant, BASE_MULTIPLIER, MIN_BOX_COUNT,
};
use tracing::debug;

/// Source of the unshuffled box counts for a board.
pub trait SizeDistribution {
    fn draw(&self, rng: &mut GameRng) -> Vec<u8>;
}

impl SizeDistribution for BoxCounts {
    fn draw(&self, rng: &mut GameRng) -> Vec<u8> {
        match self {
            Self::SmallLarge {
                small,
                small_rows,
                large,
                large_rows,
            } => {
                let mut sizes = Vec::with_capacity(small_rows + large_rows);
                for _ in 0..*small_rows {
                    sizes.push(rng.next_between(small.min, small.max));
                }
                for _ in 0..*large_rows {
                    sizes.push(rng.next_between(large.min, large.max));
                }
                sizes
            }
            Self::Multiset { counts, repeat } => counts
                .iter()
                .flat_map(|&count| std::iter::repeat(count).take(*repeat))
                .collect(),
        }
    }
}

/// Turn shuffled box counts into rows.
///
/// # Panics
///
/// Panics if any box count is below two. Variants are validated before a
/// session deals, so this only fires on a programming error.
pub fn build_rows<E: EdgeSchedule + ?Sized>(
    sizes: &[u8],
    edges: &E,
    accumulation: Accumulation,
    rng: &mut GameRng,
) -> Vec<Row> {
    let row_count = sizes.len();
    let mut carry = BASE_MULTIPLIER;
    sizes
        .iter()
        .enumerate()
        .map(|(position, &box_count)| {
            assert!(
                box_count >= MIN_BOX_COUNT,
                "row {position} has {box_count} boxes"
            );
            let exploding_index = rng.next_bounded(box_count);
            let edge = edges.house_edge(box_count, position, row_count);
            let step = step_multiplier(box_count, edge);
            let (stored, next) = accumulate(carry, step, accumulation);
            carry = next;
            Row::new(box_count, exploding_index, step, stored)
        })
        .collect()
}

/// Deal a fresh round.
pub fn generate_round<D, E>(
    id: u64,
    distribution: &D,
    edges: &E,
    accumulation: Accumulation,
    rng: &mut GameRng,
) -> Round
where
    D: SizeDistribution + ?Sized,
    E: EdgeSchedule + ?Sized,
{
    let mut sizes = distribution.draw(rng);
    rng.shuffle(&mut sizes);
    let rows = build_rows(&sizes, edges, accumulation, rng);
    debug!(
        round = id,
        rows = rows.len(),
        top = rows.last().map(|row| row.cumulative_multiplier),
        "dealt round"
    );
    Round::new(id, rows)
}

/// Deal a fresh round for a validated variant.
pub fn deal(variant: &Variant, id: u64, rng: &mut GameRng) -> Round {
    generate_round(
        id,
        &variant.box_counts,
        &variant.edges,
        variant.accumulation,
        rng,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mines::payout::{cumulative_multipliers, round2};
    use clave_types::mines::{BoxRange, EdgeTable, EdgeTiers, RoundStatus, ROW_COUNT};

    fn sorted(mut sizes: Vec<u8>) -> Vec<u8> {
        sizes.sort_unstable();
        sizes
    }

    #[test]
    fn test_small_large_draws() {
        let mut rng = GameRng::new(11, 0);
        let sizes = BoxCounts::classic().draw(&mut rng);
        assert_eq!(sizes.len(), ROW_COUNT);
        assert!(sizes[..15].iter().all(|s| (2..=4).contains(s)));
        assert!(sizes[15..].iter().all(|s| (5..=7).contains(s)));
    }

    #[test]
    fn test_multiset_draws() {
        let mut rng = GameRng::new(11, 0);
        let sizes = BoxCounts::even().draw(&mut rng);
        assert_eq!(sizes.len(), ROW_COUNT);
        for count in 3..=7u8 {
            assert_eq!(sizes.iter().filter(|&&s| s == count).count(), 5);
        }
    }

    #[test]
    fn test_generated_rounds_are_well_formed() {
        for name in Variant::PRESETS {
            let variant = Variant::preset(name).unwrap();
            for id in 0..50 {
                let mut rng = GameRng::new(99, id);
                let round = deal(&variant, id, &mut rng);

                assert_eq!(round.id, id);
                assert_eq!(round.rows.len(), ROW_COUNT);
                assert_eq!(round.status, RoundStatus::Playing);
                assert_eq!(round.current_step, 0);
                assert_eq!(round.current_multiplier, 1.0);
                for row in &round.rows {
                    assert!(row.box_count >= MIN_BOX_COUNT);
                    assert!(row.exploding_index < row.box_count);
                    assert!(row.is_untouched());
                }
            }
        }
    }

    #[test]
    fn test_multiset_survives_shuffle() {
        let variant = Variant::even();
        let mut rng = GameRng::new(5, 3);
        let round = deal(&variant, 3, &mut rng);
        let dealt: Vec<u8> = round.rows.iter().map(|row| row.box_count).collect();

        let mut rng = GameRng::new(5, 3);
        let drawn = variant.box_counts.draw(&mut rng);
        assert_eq!(sorted(dealt), sorted(drawn));
    }

    #[test]
    fn test_cumulative_matches_independent_recomputation() {
        for name in Variant::PRESETS {
            let variant = Variant::preset(name).unwrap();
            let mut rng = GameRng::new(2024, 1);
            let round = deal(&variant, 1, &mut rng);

            let steps: Vec<f64> = round
                .rows
                .iter()
                .enumerate()
                .map(|(position, row)| {
                    let edge = variant.edges.house_edge(row.box_count, position, ROW_COUNT);
                    step_multiplier(row.box_count, edge)
                })
                .collect();
            let expected = cumulative_multipliers(&steps, variant.accumulation);

            let mut product = 1.0;
            for (row, (step, cumulative)) in round.rows.iter().zip(steps.iter().zip(expected)) {
                assert_eq!(row.step_multiplier, *step);
                assert!((row.cumulative_multiplier - cumulative).abs() < 0.01);
                product = round2(product * step);
                assert!((row.cumulative_multiplier - product).abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let variant = Variant::classic();
        let a = deal(&variant, 8, &mut GameRng::new(1, 8));
        let b = deal(&variant, 8, &mut GameRng::new(1, 8));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_edge_pairs_double_every_row() {
        let distribution = BoxCounts::SmallLarge {
            small: BoxRange::new(2, 2),
            small_rows: 10,
            large: BoxRange::new(2, 2),
            large_rows: 0,
        };
        let edges = EdgeTable::Tiered {
            tiers: EdgeTiers::new(0.0, 0.05, 0.10),
        };
        let mut rng = GameRng::new(0, 0);
        let round = generate_round(0, &distribution, &edges, Accumulation::Rounded, &mut rng);

        let mut expected = 1.0;
        for row in &round.rows {
            expected *= 2.0;
            assert_eq!(row.step_multiplier, 2.0);
            assert_eq!(row.cumulative_multiplier, expected);
        }
    }

    #[test]
    #[should_panic(expected = "has 1 boxes")]
    fn test_single_box_row_is_a_programming_error() {
        let edges = EdgeTiers::new(0.0, 0.05, 0.10);
        let mut rng = GameRng::new(0, 0);
        build_rows(&[3, 1, 4], &edges, Accumulation::Rounded, &mut rng);
    }
}
