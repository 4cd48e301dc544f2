// ABOUTME: Random source abstraction and dice-term sampling.
// ABOUTME: FastRng wraps fastrand; tests inject scripted sequences through the Rng trait.

use crate::expr::DiceTerm;

/// Trait for random number generation, allowing for testing with fixed values.
pub trait Rng {
    /// Generate a random number in the range [1, max].
    fn roll(&mut self, max: u32) -> u32;
}

impl<R: Rng + ?Sized> Rng for &mut R {
    fn roll(&mut self, max: u32) -> u32 {
        (**self).roll(max)
    }
}

/// Default RNG using fastrand.
#[derive(Debug, Clone)]
pub struct FastRng(fastrand::Rng);

impl FastRng {
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    /// Derive an independent generator, advancing this one.
    pub fn fork(&mut self) -> Self {
        Self(self.0.fork())
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng for FastRng {
    fn roll(&mut self, max: u32) -> u32 {
        self.0.u32(1..=max)
    }
}

/// Sum one evaluation of a single dice term.
pub fn roll_term(term: &DiceTerm, rng: &mut impl Rng) -> i64 {
    (0..term.count).map(|_| i64::from(rng.roll(term.sides))).sum()
}

/// Sum one evaluation of every dice term, in order.
pub fn roll_terms(terms: &[DiceTerm], rng: &mut impl Rng) -> i64 {
    terms.iter().map(|term| roll_term(term, rng)).sum()
}

/// A deterministic RNG for testing. Values are returned in order and cycle.
#[cfg(test)]
pub(crate) struct ScriptedRng {
    values: Vec<u32>,
    index: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values drawn so far.
    pub(crate) fn draws(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
impl Rng for ScriptedRng {
    fn roll(&mut self, _max: u32) -> u32 {
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}
