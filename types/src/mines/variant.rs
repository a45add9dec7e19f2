use serde::{Deserialize, Serialize};

use super::{
    ConfigError, CLASSIC_LARGE_ROWS, CLASSIC_SMALL_ROWS, MAX_BOX_COUNT, MIN_BOX_COUNT,
    MULTISET_REPEAT, ROW_COUNT,
};

/// Inclusive range of box counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRange {
    pub min: u8,
    pub max: u8,
}

impl BoxRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::EmptyRange {
                min: self.min,
                max: self.max,
            });
        }
        check_box_count(self.min)?;
        check_box_count(self.max)
    }
}

/// How the box counts of a board are produced before shuffling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoxCounts {
    /// Independent draws: `small_rows` from `small`, `large_rows` from `large`.
    SmallLarge {
        small: BoxRange,
        small_rows: usize,
        large: BoxRange,
        large_rows: usize,
    },
    /// Every count in `counts` appears exactly `repeat` times.
    Multiset { counts: Vec<u8>, repeat: usize },
}

impl BoxCounts {
    pub fn classic() -> Self {
        Self::SmallLarge {
            small: BoxRange::new(2, 4),
            small_rows: CLASSIC_SMALL_ROWS,
            large: BoxRange::new(5, 7),
            large_rows: CLASSIC_LARGE_ROWS,
        }
    }

    pub fn even() -> Self {
        Self::Multiset {
            counts: vec![3, 4, 5, 6, 7],
            repeat: MULTISET_REPEAT,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Self::SmallLarge {
                small_rows,
                large_rows,
                ..
            } => small_rows + large_rows,
            Self::Multiset { counts, repeat } => counts.len() * repeat,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::SmallLarge { small, large, .. } => {
                small.validate()?;
                large.validate()?;
            }
            Self::Multiset { counts, .. } => {
                for &count in counts {
                    check_box_count(count)?;
                }
            }
        }
        let got = self.row_count();
        if got != ROW_COUNT {
            return Err(ConfigError::RowCount {
                expected: ROW_COUNT,
                got,
            });
        }
        Ok(())
    }
}

fn check_box_count(count: u8) -> Result<(), ConfigError> {
    if count < MIN_BOX_COUNT {
        return Err(ConfigError::BoxCountTooSmall(count));
    }
    if count > MAX_BOX_COUNT {
        return Err(ConfigError::BoxCountTooLarge(count));
    }
    Ok(())
}

/// House edge per box-count tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeTiers {
    /// Two boxes
    pub pair: f64,
    /// Three or four boxes
    pub small: f64,
    /// Five or more boxes
    pub large: f64,
}

impl EdgeTiers {
    pub const fn new(pair: f64, small: f64, large: f64) -> Self {
        Self { pair, small, large }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("pair", self.pair), ("small", self.small), ("large", self.large)] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::EdgeOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// Deterministic house edge lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeTable {
    Tiered { tiers: EdgeTiers },
    /// Zero edge on the first `head` and last `tail` positions.
    Cushioned {
        head: usize,
        tail: usize,
        tiers: EdgeTiers,
    },
}

impl EdgeTable {
    pub fn tiers(&self) -> &EdgeTiers {
        match self {
            Self::Tiered { tiers } | Self::Cushioned { tiers, .. } => tiers,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tiers().validate()
    }
}

/// Whether the rounded cumulative value seeds the next row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accumulation {
    /// Each row multiplies the previous row's stored (rounded) value.
    #[default]
    Rounded,
    /// Full precision is carried; only the stored value is rounded.
    Exact,
}

/// What happens to the round after a cash out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashOutPolicy {
    /// Round ends as won and waits for an explicit restart.
    #[default]
    Settle,
    /// A fresh round is dealt immediately.
    Restart,
}

/// Board tuning: box-count distribution, edge table and rounding mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub box_counts: BoxCounts,
    pub edges: EdgeTable,
    #[serde(default)]
    pub accumulation: Accumulation,
}

impl Variant {
    pub const PRESETS: [&'static str; 3] = ["classic", "even", "cushioned"];

    /// 15 rows of 2–4 boxes and 10 rows of 5–7, 0/5/10% edges.
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            box_counts: BoxCounts::classic(),
            edges: EdgeTable::Tiered {
                tiers: EdgeTiers::new(0.0, 0.05, 0.10),
            },
            accumulation: Accumulation::Rounded,
        }
    }

    /// Five rows each of 3–7 boxes, 0/5/12% edges.
    pub fn even() -> Self {
        Self {
            name: "even".to_string(),
            box_counts: BoxCounts::even(),
            edges: EdgeTable::Tiered {
                tiers: EdgeTiers::new(0.0, 0.05, 0.12),
            },
            accumulation: Accumulation::Rounded,
        }
    }

    /// Five rows each of 3–7 boxes, 18% on large rows but no edge on the
    /// first and last three positions.
    pub fn cushioned() -> Self {
        Self {
            name: "cushioned".to_string(),
            box_counts: BoxCounts::even(),
            edges: EdgeTable::Cushioned {
                head: 3,
                tail: 3,
                tiers: EdgeTiers::new(0.0, 0.05, 0.18),
            },
            accumulation: Accumulation::Rounded,
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "classic" => Ok(Self::classic()),
            "even" => Ok(Self::even()),
            "cushioned" => Ok(Self::cushioned()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn with_accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.box_counts.validate()?;
        self.edges.validate()
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::classic()
    }
}
