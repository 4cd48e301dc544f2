// ABOUTME: Types for parsed attack and damage expressions.
// ABOUTME: A ParsedExpression is an ordered list of dice terms plus one flat modifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `count` dice with `sides` faces each, always added to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub sides: u32,
}

impl DiceTerm {
    pub fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Mean of one evaluation of this term.
    pub fn mean(&self) -> f64 {
        f64::from(self.count) * (f64::from(self.sides) + 1.0) / 2.0
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D{}", self.count, self.sides)
    }
}

/// The decomposition of one textual expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedExpression {
    /// Dice terms in expression order.
    pub dice: Vec<DiceTerm>,
    /// Signed sum of every standalone modifier.
    pub modifier: i64,
}

impl ParsedExpression {
    pub fn new(dice: Vec<DiceTerm>, modifier: i64) -> Self {
        Self { dice, modifier }
    }

    /// Total number of dice across all terms.
    pub fn dice_count(&self) -> u64 {
        self.dice.iter().map(|t| u64::from(t.count)).sum()
    }

    /// Smallest possible result of one evaluation.
    pub fn min(&self) -> i64 {
        self.modifier.saturating_add(self.dice_count() as i64)
    }

    /// Largest possible result of one evaluation.
    pub fn max(&self) -> i64 {
        let dice: i64 = self
            .dice
            .iter()
            .map(|t| i64::from(t.count) * i64::from(t.sides))
            .sum();
        self.modifier.saturating_add(dice)
    }

    /// Mean of one evaluation.
    pub fn mean(&self) -> f64 {
        self.dice.iter().map(DiceTerm::mean).sum::<f64>() + self.modifier as f64
    }
}

/// Canonical form, e.g. `2D8+1D6+14`. Parsing it yields the same value.
impl fmt::Display for ParsedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.dice.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", term)?;
        }
        if self.modifier != 0 || self.dice.is_empty() {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}
