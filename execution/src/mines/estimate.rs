//! Monte Carlo house edge estimation.
//!
//! Plays many headless rounds through [Session] with a fixed cash-out
//! strategy and reports the empirical edge, alongside how often a dealt
//! board dips below a 1.0x cumulative multiplier.

use super::payout::lowest_prefix_multiplier;
use super::session::{validate_bet, Session, SessionConfig};
use super::GameRng;
use clave_types::mines::{EstimateError, Settlement, Variant};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// Rounds played per chunk; each chunk gets its own session seed.
const CHUNK_SIZE: u64 = 1_024;

/// Cash out after clearing `cash_out_after` rows (or clear the board).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strategy {
    pub cash_out_after: usize,
}

/// Running totals over simulated rounds.
///
/// Only sums are kept so partial estimates from separate chunks can be
/// folded together in any grouping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Estimate {
    pub rounds: u64,
    pub wagered: f64,
    /// Sum of per-round results from the player's side
    pub net: f64,
    pub net_squared: f64,
    /// Lowest cumulative multiplier on any dealt board, `None` before the first deal
    pub lowest_multiplier: Option<f64>,
    /// Boards whose cumulative multiplier fell below 1.0x somewhere
    pub boards_below_floor: u64,
}

impl Estimate {
    /// Fold one finished round into the totals.
    pub fn record(&mut self, wager: f64, net: f64) {
        self.rounds += 1;
        self.wagered += wager;
        self.net += net;
        self.net_squared += net * net;
    }

    fn observe_board(&mut self, lowest: f64) {
        self.lowest_multiplier = Some(match self.lowest_multiplier {
            Some(seen) => seen.min(lowest),
            None => lowest,
        });
        if lowest < 1.0 {
            self.boards_below_floor += 1;
        }
    }

    /// Fold a partial estimate into this one.
    pub fn absorb(&mut self, other: &Estimate) {
        self.rounds += other.rounds;
        self.wagered += other.wagered;
        self.net += other.net;
        self.net_squared += other.net_squared;
        if let Some(lowest) = other.lowest_multiplier {
            self.lowest_multiplier = Some(match self.lowest_multiplier {
                Some(seen) => seen.min(lowest),
                None => lowest,
            });
        }
        self.boards_below_floor += other.boards_below_floor;
    }

    fn per_round(&self, total: f64) -> f64 {
        match self.rounds {
            0 => 0.0,
            rounds => total / rounds as f64,
        }
    }

    pub fn mean_net(&self) -> f64 {
        self.per_round(self.net)
    }

    pub fn mean_wager(&self) -> f64 {
        self.per_round(self.wagered)
    }

    /// Fraction of every unit wagered that the house keeps.
    pub fn house_edge(&self) -> f64 {
        if self.wagered > 0.0 {
            -self.net / self.wagered
        } else {
            0.0
        }
    }

    /// Standard error of [Estimate::mean_net].
    pub fn standard_error(&self) -> f64 {
        if self.rounds < 2 {
            return 0.0;
        }
        let n = self.rounds as f64;
        let mean = self.net / n;
        let variance = (self.net_squared / n - mean * mean).max(0.0);
        (variance / n).sqrt()
    }

    /// Standard error of [Estimate::house_edge].
    pub fn edge_error(&self) -> f64 {
        let wager = self.mean_wager();
        if wager > 0.0 {
            self.standard_error() / wager
        } else {
            0.0
        }
    }

    pub fn below_floor_share(&self) -> f64 {
        self.per_round(self.boards_below_floor as f64)
    }
}

/// Estimate the house edge of `variant` under `strategy` over `trials` rounds.
pub fn estimate(
    variant: &Variant,
    strategy: Strategy,
    trials: u64,
    bet: f64,
    seed: u64,
) -> Result<Estimate, EstimateError> {
    variant.validate()?;
    let bet = validate_bet(Some(bet))?;
    let chunks: Vec<(u64, u64)> = (0..trials.div_ceil(CHUNK_SIZE))
        .map(|chunk| {
            let start = chunk * CHUNK_SIZE;
            (chunk, (trials - start).min(CHUNK_SIZE))
        })
        .collect();

    #[cfg(feature = "parallel")]
    let partials = chunks
        .into_par_iter()
        .map(|(chunk, count)| run_chunk(variant, strategy, count, bet, seed, chunk))
        .collect::<Result<Vec<_>, _>>()?;
    #[cfg(not(feature = "parallel"))]
    let partials = chunks
        .into_iter()
        .map(|(chunk, count)| run_chunk(variant, strategy, count, bet, seed, chunk))
        .collect::<Result<Vec<_>, _>>()?;

    // Fold in chunk order so results do not depend on scheduling
    let mut total = Estimate::default();
    for partial in &partials {
        total.absorb(partial);
    }
    debug!(
        variant = %variant.name,
        trials,
        edge = total.house_edge(),
        "estimate complete"
    );
    Ok(total)
}

fn run_chunk(
    variant: &Variant,
    strategy: Strategy,
    count: u64,
    bet: f64,
    seed: u64,
    chunk: u64,
) -> Result<Estimate, EstimateError> {
    let config = SessionConfig::headless(variant.clone()).with_seed(seed.wrapping_add(chunk));
    let mut session = Session::new(config)?;
    session.set_bet_amount(Some(bet))?;
    // Player picks come from a separate stream so they never shift the deal
    let mut player = GameRng::new(seed.wrapping_add(chunk), u64::MAX);
    let mut estimate = Estimate::default();

    for _ in 0..count {
        let round = session.start_or_restart_round();
        let row_count = round.rows.len();
        estimate.observe_board(lowest_prefix_multiplier(&round.rows));

        let target = strategy.cash_out_after.clamp(1, row_count);
        let mut net = 0.0;
        for step in 0..target {
            let box_count = match session.round().and_then(|round| round.current_row()) {
                Some(row) => row.box_count as usize,
                None => break,
            };
            let pick = player.next_index(box_count);
            let delta = session.click_box(step, pick)?;
            match delta.settlement {
                Some(Settlement::Lost { debited }) => {
                    net = -debited;
                    break;
                }
                Some(Settlement::Won { credited }) => {
                    net = credited;
                    break;
                }
                None if step + 1 == target => {
                    let delta = session.cash_out()?;
                    net = delta.credited - delta.debited;
                }
                None => {}
            }
        }
        estimate.record(bet, net);
    }
    Ok(estimate)
}
