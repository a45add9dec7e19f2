use clave_execution::mines::payout::lowest_prefix_multiplier;
use clave_execution::{GameRng, Session, SessionConfig};
use clave_types::mines::{
    Accumulation, CashOutPolicy, GameError, Round, Settlement, Tally, Variant, ADVANCE_DELAY_MS,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;
use tracing::{info, Level};

/// Configuration file for the simulator.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Preset name, ignored when `custom` is set
    #[serde(default = "default_variant")]
    pub variant: String,
    #[serde(default)]
    pub custom: Option<Variant>,
    #[serde(default)]
    pub accumulation: Option<Accumulation>,
    #[serde(default)]
    pub cash_out_policy: CashOutPolicy,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error(transparent)]
    Variant(#[from] clave_types::mines::ConfigError),
}

pub struct ValidatedConfig {
    pub session: SessionConfig,
    pub log_level: Level,
}

fn default_variant() -> String {
    "classic".to_string()
}

fn default_advance_delay_ms() -> u64 {
    ADVANCE_DELAY_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            custom: None,
            accumulation: None,
            cash_out_policy: CashOutPolicy::default(),
            advance_delay_ms: default_advance_delay_ms(),
            log_level: default_log_level(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        let mut variant = match self.custom {
            Some(custom) => custom,
            None => Variant::preset(&self.variant)?,
        };
        if let Some(accumulation) = self.accumulation {
            variant = variant.with_accumulation(accumulation);
        }
        variant.validate()?;

        Ok(ValidatedConfig {
            session: SessionConfig {
                variant,
                cash_out_policy: self.cash_out_policy,
                advance_delay: Duration::from_millis(self.advance_delay_ms),
                seed: self.seed,
            },
            log_level,
        })
    }
}

/// Text table of a board, top row first.
pub fn render_board(round: &Round) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "round {} ({:?})", round.id, round.status);
    let _ = writeln!(out, "{:>4}  {:>5}  {:>6}  {:>7}", "row", "boxes", "step", "total");
    for (index, row) in round.rows.iter().enumerate().rev() {
        let marker = if row.exploded {
            " x"
        } else if row.completed {
            " ok"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:>4}  {:>5}  {:>6.3}  {:>6.2}x{}",
            index + 1,
            row.box_count,
            row.step_multiplier,
            row.cumulative_multiplier,
            marker
        );
    }
    let _ = writeln!(out, "lowest {:.2}x", lowest_prefix_multiplier(&round.rows));
    out
}

/// Play `rounds` rounds through the session API, cashing out after
/// `cash_out_after` cleared rows. Safe clicks wait out the presentation delay
/// before redeeming their unlock ticket.
pub async fn autoplay(
    session: &mut Session,
    rounds: u32,
    cash_out_after: usize,
    player: &mut GameRng,
) -> Result<Tally, GameError> {
    let delay = session.config().advance_delay;
    for _ in 0..rounds {
        let round = session.start_or_restart_round();
        let round_id = round.id;
        let target = cash_out_after.clamp(1, round.rows.len());

        for step in 0..target {
            let box_count = match session.round().and_then(|round| round.current_row()) {
                Some(row) => row.box_count as usize,
                None => break,
            };
            let delta = session.click_box(step, player.next_index(box_count))?;
            match delta.settlement {
                Some(Settlement::Lost { debited }) => {
                    info!(round = round_id, row = step, status = ?delta.status, debited, "autoplay lost");
                    break;
                }
                Some(Settlement::Won { credited }) => {
                    info!(round = round_id, credited, "autoplay cleared board");
                    break;
                }
                None if step + 1 == target => {
                    let delta = session.cash_out()?;
                    info!(
                        round = round_id,
                        credited = delta.credited,
                        debited = delta.debited,
                        "autoplay cashed out"
                    );
                }
                None => {
                    if let Some(ticket) = delta.unlock {
                        tokio::time::sleep(delay).await;
                        session.unlock(ticket);
                    }
                }
            }
        }
    }
    Ok(*session.tally())
}
