// ABOUTME: Scenario configuration for one simulation run.
// ABOUTME: Holds target, expressions, advantage mode and trial settings with validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted trial count.
pub const MAX_TRIALS: usize = 1_000_000;

pub const DEFAULT_TRIALS: usize = 100_000;
pub const DEFAULT_CRIT_THRESHOLD: u32 = 20;

/// How the base d20 is rolled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvantageMode {
    /// Roll once.
    #[default]
    None,
    /// Roll twice, keep the higher.
    Advantage,
    /// Roll twice, keep the lower.
    Disadvantage,
}

impl FromStr for AdvantageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "normal" | "无" => Ok(AdvantageMode::None),
            "advantage" | "adv" | "优势" => Ok(AdvantageMode::Advantage),
            "disadvantage" | "dis" | "劣势" => Ok(AdvantageMode::Disadvantage),
            _ => Err(Error::UnknownAdvantage(s.to_string())),
        }
    }
}

impl fmt::Display for AdvantageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvantageMode::None => write!(f, "none"),
            AdvantageMode::Advantage => write!(f, "advantage"),
            AdvantageMode::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

/// Everything needed to run one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Total the attack roll must meet or beat.
    pub target_defense: i64,
    /// Carried for callers; not used by the simulation.
    pub target_hp: i64,
    /// Attack bonus on top of the base d20, e.g. `-5+1D4+4`.
    pub attack_expression: String,
    /// Damage dealt on a hit, e.g. `2D8+10+4+1D6`.
    pub damage_expression: String,
    /// Carried for callers; every trial is a single attack.
    pub num_attacks: u32,
    pub advantage: AdvantageMode,
    pub trials: usize,
    /// Lowest base roll that counts as a critical.
    pub crit_threshold: u32,
    /// Seed for reproducible runs. `None` draws fresh entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            target_defense: 15,
            target_hp: 80,
            attack_expression: String::new(),
            damage_expression: String::new(),
            num_attacks: 1,
            advantage: AdvantageMode::None,
            trials: DEFAULT_TRIALS,
            crit_threshold: DEFAULT_CRIT_THRESHOLD,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Check the numeric settings. Expressions are checked when parsed.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 || self.trials > MAX_TRIALS {
            return Err(Error::InvalidTrials(self.trials));
        }
        if !(1..=20).contains(&self.crit_threshold) {
            return Err(Error::InvalidCritThreshold(self.crit_threshold));
        }
        Ok(())
    }
}
