// ABOUTME: Per-trial damage sampling and reduction into summary statistics.
// ABOUTME: Criticals double the dice portion only; fumbles deal no damage.

use crate::expr::ParsedExpression;
use crate::roller::{roll_terms, Rng};
use crate::trials::{Tier, Tiers};
use serde::{Deserialize, Serialize};

/// Summary of one simulation run. Rates are fractions of `trials`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsBundle {
    pub trials: usize,
    pub hits: usize,
    pub crits: usize,
    pub fumbles: usize,
    pub hit_rate: f64,
    pub crit_rate: f64,
    pub fumble_rate: f64,
    /// Mean over every trial, hit or not.
    pub mean_damage_all: f64,
    /// Mean over trials that hit; 0 when nothing hit.
    pub mean_damage_on_hit: f64,
    /// Mean over critical trials; 0 when none occurred.
    pub mean_damage_on_crit: f64,
    /// Damage dealt on hits divided by `trials`.
    pub expected_damage: f64,
}

/// Running sums for a batch, mergeable across chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub trials: usize,
    pub hits: usize,
    pub crits: usize,
    pub fumbles: usize,
    pub damage_all: i128,
    pub damage_on_hit: i128,
    pub damage_on_crit: i128,
}

impl Tally {
    /// Reduce per-trial vectors.
    ///
    /// The vectors are expected to have equal length; if they do not, only
    /// the trials present in all of them are counted.
    pub fn from_vectors(hits: &[bool], tiers: &Tiers, damage: &[i64]) -> Self {
        let mut tally = Tally::default();
        let trials = damage
            .iter()
            .zip(hits)
            .zip(tiers.is_critical.iter().zip(&tiers.is_fumble));
        for ((&dmg, &hit), (&critical, &fumble)) in trials {
            let dmg = i128::from(dmg);
            tally.trials += 1;
            tally.damage_all += dmg;
            if hit {
                tally.hits += 1;
                tally.damage_on_hit += dmg;
            }
            if critical {
                tally.crits += 1;
                tally.damage_on_crit += dmg;
            }
            if fumble {
                tally.fumbles += 1;
            }
        }
        tally
    }

    pub fn merge(&mut self, other: &Tally) {
        self.trials += other.trials;
        self.hits += other.hits;
        self.crits += other.crits;
        self.fumbles += other.fumbles;
        self.damage_all += other.damage_all;
        self.damage_on_hit += other.damage_on_hit;
        self.damage_on_crit += other.damage_on_crit;
    }

    pub fn stats(&self) -> StatsBundle {
        StatsBundle {
            trials: self.trials,
            hits: self.hits,
            crits: self.crits,
            fumbles: self.fumbles,
            hit_rate: ratio(self.hits as i128, self.trials),
            crit_rate: ratio(self.crits as i128, self.trials),
            fumble_rate: ratio(self.fumbles as i128, self.trials),
            mean_damage_all: ratio(self.damage_all, self.trials),
            mean_damage_on_hit: ratio(self.damage_on_hit, self.hits),
            mean_damage_on_crit: ratio(self.damage_on_crit, self.crits),
            expected_damage: ratio(self.damage_on_hit, self.trials),
        }
    }
}

/// Mean of an empty subset is 0, not NaN.
fn ratio(sum: i128, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    sum as f64 / n as f64
}

/// Sample damage for one trial of the given tier.
///
/// Fumbles draw nothing. Criticals roll the dice once and double them; the
/// flat modifier is added once. The result never drops below zero.
pub fn roll_damage(tier: Tier, damage: &ParsedExpression, rng: &mut impl Rng) -> i64 {
    let dice = match tier {
        Tier::Fumble => return 0,
        Tier::Critical => roll_terms(&damage.dice, rng).saturating_mul(2),
        Tier::Normal => roll_terms(&damage.dice, rng),
    };
    dice.saturating_add(damage.modifier).max(0)
}

/// Sample damage for every trial and summarize it.
pub fn aggregate(
    hits: &[bool],
    tiers: &Tiers,
    damage: &ParsedExpression,
    rng: &mut impl Rng,
) -> (Vec<i64>, StatsBundle) {
    let (damage, tally) = aggregate_tally(hits, tiers, damage, rng);
    (damage, tally.stats())
}

pub(crate) fn aggregate_tally(
    hits: &[bool],
    tiers: &Tiers,
    damage: &ParsedExpression,
    rng: &mut impl Rng,
) -> (Vec<i64>, Tally) {
    let per_trial: Vec<i64> = (0..tiers.len())
        .map(|i| roll_damage(tiers.tier(i), damage, rng))
        .collect();
    let tally = Tally::from_vectors(hits, tiers, &per_trial);
    (per_trial, tally)
}
