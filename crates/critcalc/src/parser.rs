// ABOUTME: Folds the scanner's token stream into a ParsedExpression.
// ABOUTME: Validates dice terms and reports skipped fragments without failing.

use crate::error::{Error, Result};
use crate::expr::{DiceTerm, ParsedExpression};
use crate::lexer::{Lexer, Token};

/// Upper bound on the dice in a single term.
pub const MAX_DICE_COUNT: u32 = 1000;

/// Upper bound on the magnitude of a single modifier and of their sum.
pub const MAX_MODIFIER: i64 = 1_000_000_000;

/// A fragment of the input that the scanner ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Position in the input after whitespace removal.
    pub pos: usize,
    pub text: String,
}

/// A parsed expression together with everything that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub expression: ParsedExpression,
    pub skipped: Vec<Skipped>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Parse an expression, logging any skipped fragments.
pub fn parse(input: &str) -> Result<ParsedExpression> {
    let report = parse_report(input)?;
    for skipped in &report.skipped {
        tracing::warn!(
            input,
            fragment = %skipped.text,
            pos = skipped.pos,
            "ignoring malformed expression fragment"
        );
    }
    Ok(report.expression)
}

/// Parse an expression and return the skipped fragments alongside it.
pub fn parse_report(input: &str) -> Result<ParseReport> {
    let mut dice = Vec::new();
    let mut modifier: i64 = 0;
    let mut skipped = Vec::new();

    for token in Lexer::new(input).tokenize() {
        match token {
            Token::Dice { count, sides } => dice.push(dice_term(count, sides)?),
            Token::Modifier(n) => modifier = checked_modifier(modifier, n)?,
            Token::Skipped { text, pos } => skipped.push(Skipped { pos, text }),
        }
    }

    Ok(ParseReport {
        expression: ParsedExpression::new(dice, modifier),
        skipped,
    })
}

fn checked_modifier(sum: i64, n: i64) -> Result<i64> {
    if n.abs() > MAX_MODIFIER {
        return Err(Error::InvalidModifier(n));
    }
    let sum = sum + n;
    if sum.abs() > MAX_MODIFIER {
        return Err(Error::InvalidModifier(sum));
    }
    Ok(sum)
}

fn dice_term(count: u32, sides: u32) -> Result<DiceTerm> {
    if count == 0 || count > MAX_DICE_COUNT {
        return Err(Error::InvalidDiceCount(count));
    }
    if sides == 0 {
        return Err(Error::InvalidDiceSides(sides));
    }
    Ok(DiceTerm::new(count, sides))
}
