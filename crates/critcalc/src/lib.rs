// ABOUTME: Core library for estimating d20 attack outcomes by Monte Carlo simulation.
// ABOUTME: Parses attack/damage expressions and reports hit, crit, fumble and damage statistics.

//! # Critcalc
//!
//! Expected damage for a d20 attack against a fixed defense, estimated by
//! rolling many independent trials.
//!
//! ## Quick Start
//!
//! ```
//! use critcalc::{simulate, AdvantageMode, SimConfig};
//!
//! let config = SimConfig {
//!     target_defense: 15,
//!     attack_expression: "-5+1D4+4".to_string(),
//!     damage_expression: "2D8+10+4+1D6".to_string(),
//!     advantage: AdvantageMode::Advantage,
//!     trials: 10_000,
//!     ..Default::default()
//! };
//! let stats = simulate(&config).unwrap();
//! println!("Hit rate: {:.1}%", stats.hit_rate * 100.0);
//! println!("Expected damage: {:.2}", stats.expected_damage);
//! ```
//!
//! ## Expressions
//!
//! Attack and damage expressions are sums of dice terms (`2D8`, `1d6`) and
//! signed integers (`+4`, `-5`). Whitespace is ignored. Dice terms are always
//! added, and fragments that fit neither form are skipped with a warning.
//!
//! ## Resolution
//!
//! - A natural 1 is a fumble: automatic miss, no damage.
//! - A base roll at or above the crit threshold is a critical: automatic hit,
//!   damage dice doubled.
//! - Anything else hits when `d20 + attack >= target_defense`.

pub mod config;
pub mod damage;
pub mod error;
pub mod expr;
pub mod hit;
pub mod lexer;
pub mod parser;
pub mod roller;
pub mod sim;
pub mod trials;

pub use config::{AdvantageMode, SimConfig};
pub use damage::{StatsBundle, Tally};
pub use error::{Error, Result};
pub use expr::{DiceTerm, ParsedExpression};
pub use parser::{parse_report, ParseReport};
pub use roller::{FastRng, Rng};
pub use sim::{simulate, simulate_with_rng, Outcome, Simulation};
pub use trials::{Tier, Tiers, TrialBatch};

/// Parse an attack or damage expression.
///
/// # Examples
///
/// ```
/// use critcalc::DiceTerm;
///
/// let expr = critcalc::parse("2D8+10+4+1D6").unwrap();
/// assert_eq!(expr.dice, vec![DiceTerm::new(2, 8), DiceTerm::new(1, 6)]);
/// assert_eq!(expr.modifier, 14);
/// ```
pub fn parse(input: &str) -> Result<ParsedExpression> {
    parser::parse(input)
}
