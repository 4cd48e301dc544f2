// ABOUTME: Error types for the critcalc library.
// ABOUTME: Covers invalid dice terms and invalid simulation configuration.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid dice count: {0}")]
    InvalidDiceCount(u32),

    #[error("Invalid dice sides: {0}")]
    InvalidDiceSides(u32),

    #[error("Invalid modifier: {0} (magnitude above {max})", max = crate::parser::MAX_MODIFIER)]
    InvalidModifier(i64),

    #[error("Invalid trial count: {0} (expected 1..={max})", max = crate::config::MAX_TRIALS)]
    InvalidTrials(usize),

    #[error("Invalid crit threshold: {0} (expected 1..=20)")]
    InvalidCritThreshold(u32),

    #[error("Unknown advantage mode '{0}' (expected none, advantage or disadvantage)")]
    UnknownAdvantage(String),

    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
