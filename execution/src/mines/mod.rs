//! Mines game execution module.
//!
//! This module contains the game logic for the mines board:
//! - Round generation (box counts, shuffling, exploding boxes)
//! - Payout model (house edge schedule, cumulative multipliers)
//! - Board state machine (clicks, cash out)
//! - Session (bet validation, tally, presentation unlock tickets)
//! - Monte Carlo house edge estimation

pub mod board;
pub mod estimate;
pub mod generator;
pub mod payout;
pub mod session;

pub use board::Click;
pub use estimate::{estimate, Estimate, Strategy};
pub use generator::{build_rows, deal, generate_round, SizeDistribution};
pub use payout::EdgeSchedule;
pub use session::{validate_bet, Session, SessionConfig};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Deterministic random number generator for dealing boards.
///
/// Every round draws from its own ChaCha20 stream, selected by the round id,
/// so a session seed reproduces the whole sequence of boards.
#[derive(Clone)]
pub struct GameRng {
    inner: ChaCha20Rng,
}

impl GameRng {
    /// Create a new RNG from a session seed and round id.
    pub fn new(seed: u64, round_id: u64) -> Self {
        let mut inner = ChaCha20Rng::seed_from_u64(seed);
        inner.set_stream(round_id);
        Self { inner }
    }

    /// Create an RNG seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha20Rng::from_entropy(),
        }
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.inner.gen()
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_u8();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Get a random value in range [min, max].
    pub fn next_between(&mut self, min: u8, max: u8) -> u8 {
        self.inner.gen_range(min..=max)
    }

    /// Get a random index in range [0, upper).
    pub fn next_index(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.inner.gen_range(0..upper)
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_index(i + 1);
            slice.swap(i, j);
        }
    }
}
