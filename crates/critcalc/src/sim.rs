// ABOUTME: Monte Carlo driver for one attack scenario.
// ABOUTME: Parses expressions once, then rolls, classifies, resolves hits and aggregates damage.

use crate::config::SimConfig;
use crate::damage::{aggregate_tally, StatsBundle, Tally};
use crate::error::{Error, Result};
use crate::expr::ParsedExpression;
use crate::hit;
use crate::parser;
use crate::roller::{FastRng, Rng};
use crate::trials::TrialBatch;
use rayon::prelude::*;

/// Every per-trial vector from one run, plus its summary.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub batch: TrialBatch,
    pub hits: Vec<bool>,
    pub damage: Vec<i64>,
    pub stats: StatsBundle,
}

/// A validated scenario, ready to run any number of times.
///
/// Each run is an independent batch; nothing carries over between runs.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    attack: ParsedExpression,
    damage: ParsedExpression,
}

impl Simulation {
    /// Validate the configuration and parse both expressions.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let attack = parser::parse(&config.attack_expression)?;
        let damage = parser::parse(&config.damage_expression)?;
        Ok(Self {
            config,
            attack,
            damage,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn attack(&self) -> &ParsedExpression {
        &self.attack
    }

    pub fn damage(&self) -> &ParsedExpression {
        &self.damage
    }

    /// Run with the configured seed, or fresh entropy if there is none.
    pub fn run(&self) -> StatsBundle {
        let mut rng = self.master_rng();
        self.run_with_rng(&mut rng)
    }

    pub fn run_with_rng(&self, rng: &mut impl Rng) -> StatsBundle {
        self.run_detailed_with_rng(rng).stats
    }

    /// Run and keep the per-trial vectors.
    pub fn run_detailed_with_rng(&self, rng: &mut impl Rng) -> Outcome {
        tracing::debug!(
            trials = self.config.trials,
            advantage = %self.config.advantage,
            crit_threshold = self.config.crit_threshold,
            target_defense = self.config.target_defense,
            attack = %self.attack,
            damage = %self.damage,
            "running simulation"
        );
        let (batch, hits, damage, tally) = self.pipeline(self.config.trials, rng);
        Outcome {
            batch,
            hits,
            damage,
            stats: tally.stats(),
        }
    }

    /// Run in chunks of `chunk_size` trials across the rayon thread pool.
    ///
    /// Each chunk gets its own generator forked from the master source before
    /// any work starts, so a seeded run gives the same result for the same
    /// chunk size regardless of thread count.
    pub fn run_parallel(&self, chunk_size: usize) -> Result<StatsBundle> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize(chunk_size));
        }
        let mut master = self.master_rng();
        let trials = self.config.trials;
        let chunks: Vec<(usize, FastRng)> = (0..trials)
            .step_by(chunk_size)
            .map(|start| (chunk_size.min(trials - start), master.fork()))
            .collect();
        tracing::debug!(trials, chunks = chunks.len(), chunk_size, "running simulation in parallel");

        let tally = chunks
            .into_par_iter()
            .map(|(n, mut rng)| self.pipeline(n, &mut rng).3)
            .reduce(Tally::default, |mut acc, part| {
                acc.merge(&part);
                acc
            });
        Ok(tally.stats())
    }

    fn pipeline(&self, trials: usize, rng: &mut impl Rng) -> (TrialBatch, Vec<bool>, Vec<i64>, Tally) {
        let batch = TrialBatch::new(trials, self.config.advantage, self.config.crit_threshold, rng);
        let hits = hit::resolve(&batch, &self.attack, self.config.target_defense, rng);
        let (damage, tally) = aggregate_tally(&hits, &batch.tiers, &self.damage, rng);
        (batch, hits, damage, tally)
    }

    fn master_rng(&self) -> FastRng {
        match self.config.seed {
            Some(seed) => FastRng::with_seed(seed),
            None => FastRng::new(),
        }
    }
}

/// Validate, parse and run one scenario.
pub fn simulate(config: &SimConfig) -> Result<StatsBundle> {
    Ok(Simulation::new(config.clone())?.run())
}

/// Like [`simulate`], drawing from the given generator instead of the seed.
pub fn simulate_with_rng(config: &SimConfig, rng: &mut impl Rng) -> Result<StatsBundle> {
    Ok(Simulation::new(config.clone())?.run_with_rng(rng))
}
