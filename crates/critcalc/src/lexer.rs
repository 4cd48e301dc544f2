// ABOUTME: Single-pass scanner for attack and damage expressions.
// ABOUTME: Splits strings like "2D8+10-5+1D6" into dice, modifier and skipped tokens.

/// A token in the expression language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A dice term such as `2D8`. Values are unchecked; zero is possible.
    Dice { count: u32, sides: u32 },
    /// A standalone signed integer such as `+4` or `-10`.
    Modifier(i64),
    /// A fragment that matched neither pattern.
    Skipped { text: String, pos: usize },
}

/// A scanner over an expression with all whitespace removed.
///
/// At each position the scanner tries, in order:
/// 1. a dice token `\d+[dD]\d+`, taking the longest digit runs;
/// 2. a modifier token `[+-]\d+` whose sign does not follow a dice marker
///    and whose digits are not followed by one.
///
/// Anything else is collected into a `Skipped` token. A sign whose digits
/// run into a dice marker (`+1D6`) is skipped alone so the digits can start
/// the dice token.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    /// Create a new lexer for the given input.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().filter(|c| !c.is_whitespace()).collect(),
            pos: 0,
        }
    }

    /// Scan the whole input.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Get the next token, or `None` at end of input.
    ///
    /// Consecutive unmatched characters are merged into one `Skipped` token.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.pos >= self.chars.len() {
            return None;
        }

        if let Some(token) = self.dice().or_else(|| self.modifier()) {
            return Some(token);
        }

        let start = self.pos;
        self.pos += 1;
        while self.pos < self.chars.len() && !self.starts_token() {
            self.pos += 1;
        }
        Some(Token::Skipped {
            text: self.chars[start..self.pos].iter().collect(),
            pos: start,
        })
    }

    fn starts_token(&mut self) -> bool {
        let saved = self.pos;
        let matched = self.dice().or_else(|| self.modifier()).is_some();
        self.pos = saved;
        matched
    }

    fn dice(&mut self) -> Option<Token> {
        let (count, after_count) = self.digits(self.pos)?;
        if !self.is_marker(after_count) {
            return None;
        }
        let (sides, end) = self.digits(after_count + 1)?;
        self.pos = end;
        Some(Token::Dice {
            count: saturate_u32(count),
            sides: saturate_u32(sides),
        })
    }

    fn modifier(&mut self) -> Option<Token> {
        let negative = match self.chars.get(self.pos)? {
            '+' => false,
            '-' => true,
            _ => return None,
        };
        if self.pos > 0 && self.is_marker(self.pos - 1) {
            return None;
        }
        let (value, end) = self.digits(self.pos + 1)?;
        if self.is_marker(end) {
            return None;
        }
        self.pos = end;
        let value = i64::try_from(value).unwrap_or(i64::MAX);
        Some(Token::Modifier(if negative { -value } else { value }))
    }

    /// Read a run of ASCII digits starting at `from`, saturating on overflow.
    fn digits(&self, from: usize) -> Option<(u64, usize)> {
        let mut value: u64 = 0;
        let mut end = from;
        while let Some(digit) = self.chars.get(end).and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(u64::from(digit));
            end += 1;
        }
        (end > from).then_some((value, end))
    }

    fn is_marker(&self, at: usize) -> bool {
        matches!(self.chars.get(at), Some('d' | 'D'))
    }
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
