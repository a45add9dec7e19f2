//! Player session.
//!
//! The session owns the current round, the bet and the running tally. Every
//! handler runs synchronously; the presentation delay between rows is
//! expressed as an [UnlockTicket] the caller redeems once its timer fires.

use super::board::{self, Click};
use super::generator::deal;
use super::payout::winnings;
use super::GameRng;
use clave_types::mines::{
    CashOutPolicy, ConfigError, GameError, InvalidAction, Round, RoundDelta, RoundStatus, Row,
    SessionDelta, Settlement, Tally, UnlockTicket, Variant, ADVANCE_DELAY_MS,
};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for a [Session].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub variant: Variant,
    pub cash_out_policy: CashOutPolicy,
    /// Delay before the next row becomes interactive. Zero disables locking.
    pub advance_delay: Duration,
    /// Fixed seed for reproducible boards; drawn from the OS when unset.
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Configuration without a presentation delay, for tests and simulations.
    pub fn headless(variant: Variant) -> Self {
        Self {
            variant,
            advance_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_cash_out_policy(mut self, policy: CashOutPolicy) -> Self {
        self.cash_out_policy = policy;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            cash_out_policy: CashOutPolicy::default(),
            advance_delay: Duration::from_millis(ADVANCE_DELAY_MS),
            seed: None,
        }
    }
}

pub struct Session {
    config: SessionConfig,
    seed: u64,
    next_round_id: u64,
    round: Option<Round>,
    bet_amount: Option<f64>,
    tally: Tally,
    locked: Option<UnlockTicket>,
}

impl Session {
    /// Create a session. No round is dealt until [Session::start_or_restart_round].
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.variant.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            seed,
            next_round_id: 0,
            round: None,
            bet_amount: None,
            tally: Tally::default(),
            locked: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn bet_amount(&self) -> Option<f64> {
        self.bet_amount
    }

    pub fn status(&self) -> RoundStatus {
        self.round
            .as_ref()
            .map_or(RoundStatus::NotStarted, |round| round.status)
    }

    /// Whether the current row is waiting on an unlock ticket.
    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// Deal a fresh round, replacing the current one and voiding any
    /// outstanding unlock ticket.
    pub fn start_or_restart_round(&mut self) -> &Round {
        let id = self.allocate_round_id();
        let mut rng = GameRng::new(self.seed, id);
        let round = deal(&self.config.variant, id, &mut rng);
        self.replace_round(round)
    }

    /// Start a round from explicit rows, e.g. to replay a recorded board.
    /// Rows are checked the way the generator deals them; a rejected board
    /// leaves the current round in place.
    pub fn start_with_rows(&mut self, rows: Vec<Row>) -> Result<&Round, ConfigError> {
        if rows.is_empty() {
            return Err(ConfigError::EmptyBoard);
        }
        for (position, row) in rows.iter().enumerate() {
            row.validate(position)?;
        }
        let id = self.allocate_round_id();
        Ok(self.replace_round(Round::new(id, rows)))
    }

    fn allocate_round_id(&mut self) -> u64 {
        let id = self.next_round_id;
        self.next_round_id += 1;
        id
    }

    fn replace_round(&mut self, round: Round) -> &Round {
        if let Some(previous) = &self.round {
            if previous.is_playing() && previous.stake.is_some() {
                debug!(round = previous.id, "abandoned round in play");
            }
        }
        self.locked = None;
        debug!(round = round.id, "round started");
        self.round.insert(round)
    }

    /// Store the wager for the next click. Unset, NaN, infinite and
    /// non-positive values clear the bet and are rejected.
    pub fn set_bet_amount(&mut self, value: Option<f64>) -> Result<(), GameError> {
        match validate_bet(value) {
            Ok(amount) => {
                self.bet_amount = Some(amount);
                Ok(())
            }
            Err(err) => {
                self.bet_amount = None;
                Err(err)
            }
        }
    }

    fn require_bet(&self) -> Result<f64, GameError> {
        self.bet_amount.ok_or(GameError::InvalidBetAmount)
    }

    /// Apply a click at `row_index`. Rejected clicks leave the session untouched.
    pub fn click_box(
        &mut self,
        row_index: usize,
        box_index: usize,
    ) -> Result<RoundDelta, GameError> {
        let bet = self.require_bet()?;
        let round = self
            .round
            .as_mut()
            .ok_or(InvalidAction::NotPlaying(RoundStatus::NotStarted))?;

        if let Some(ticket) = self.locked {
            if ticket.round_id == round.id && row_index == ticket.step {
                debug!(round = round.id, row = row_index, "click on locked row");
                return Err(InvalidAction::RowLocked(row_index).into());
            }
        }

        let outcome = board::click(round, row_index, box_index, bet).map_err(|err| {
            debug!(round = round.id, row = row_index, box_index, %err, "click rejected");
            err
        })?;
        let stake = round.stake.unwrap_or(bet);

        let mut unlock = None;
        let settlement = match outcome {
            Click::Exploded => {
                self.tally.total_lost += stake;
                self.tally.rounds_lost += 1;
                info!(round = round.id, row = row_index, stake, "round lost");
                Some(Settlement::Lost { debited: stake })
            }
            Click::Cleared { finished: true } => {
                let settlement = settle(&mut self.tally, stake, round.current_multiplier);
                info!(
                    round = round.id,
                    multiplier = round.current_multiplier,
                    ?settlement,
                    "board cleared"
                );
                Some(settlement)
            }
            Click::Cleared { finished: false } => {
                if !self.config.advance_delay.is_zero() {
                    let ticket = UnlockTicket {
                        round_id: round.id,
                        step: round.current_step,
                    };
                    self.locked = Some(ticket);
                    unlock = Some(ticket);
                }
                debug!(
                    round = round.id,
                    row = row_index,
                    multiplier = round.current_multiplier,
                    "row cleared"
                );
                None
            }
        };

        Ok(RoundDelta {
            round_id: round.id,
            row_index,
            row: round.rows[row_index].clone(),
            status: round.status,
            current_step: round.current_step,
            current_multiplier: round.current_multiplier,
            unlock,
            settlement,
        })
    }

    /// Redeem an unlock ticket once the presentation delay has elapsed.
    /// Tickets from replaced rounds or already redeemed ones are ignored.
    pub fn unlock(&mut self, ticket: UnlockTicket) -> bool {
        if self.locked == Some(ticket) {
            self.locked = None;
            true
        } else {
            debug!(round = ticket.round_id, step = ticket.step, "stale unlock ignored");
            false
        }
    }

    /// Bank the current multiplier and end the round.
    pub fn cash_out(&mut self) -> Result<SessionDelta, GameError> {
        let bet = self.require_bet()?;
        let round = self
            .round
            .as_mut()
            .ok_or(InvalidAction::NotPlaying(RoundStatus::NotStarted))?;

        let multiplier = board::cash_out(round)?;
        let stake = round.stake.unwrap_or(bet);
        let round_id = round.id;

        let (credited, debited) = match settle(&mut self.tally, stake, multiplier) {
            Settlement::Won { credited } => (credited, 0.0),
            Settlement::Lost { debited } => (0.0, debited),
        };
        self.locked = None;
        info!(round = round_id, multiplier, credited, debited, "cashed out");

        if self.config.cash_out_policy == CashOutPolicy::Restart {
            self.start_or_restart_round();
        }

        Ok(SessionDelta {
            round_id,
            status: self.status(),
            credited,
            debited,
            total_won: self.tally.total_won,
            total_lost: self.tally.total_lost,
        })
    }
}

/// Check a wager: unset, NaN, infinite and non-positive values are rejected.
pub fn validate_bet(value: Option<f64>) -> Result<f64, GameError> {
    match value {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(GameError::InvalidBetAmount),
    }
}

/// Book a won round. Banking below 1.0x returns less than the stake, so the
/// shortfall goes to `total_lost` and `total_won` never decreases.
fn settle(tally: &mut Tally, stake: f64, multiplier: f64) -> Settlement {
    let profit = winnings(stake, multiplier);
    tally.rounds_won += 1;
    if profit < 0.0 {
        tally.total_lost += -profit;
        Settlement::Lost { debited: -profit }
    } else {
        tally.total_won += profit;
        Settlement::Won { credited: profit }
    }
}
