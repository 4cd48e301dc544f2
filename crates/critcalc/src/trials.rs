// ABOUTME: Base d20 roll generation and fumble/critical/normal classification.
// ABOUTME: Produces the columnar TrialBatch consumed by hit and damage resolution.

use crate::config::AdvantageMode;
use crate::roller::Rng;

/// Faces on the base attack die.
pub const BASE_DIE: u32 = 20;

/// The outcome tier of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Fumble,
    Critical,
    Normal,
}

/// Per-trial tier flags. Exactly one flag is set for every trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tiers {
    pub is_fumble: Vec<bool>,
    pub is_critical: Vec<bool>,
    pub is_normal: Vec<bool>,
}

impl Tiers {
    pub fn len(&self) -> usize {
        self.is_normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_normal.is_empty()
    }

    pub fn tier(&self, i: usize) -> Tier {
        if self.is_fumble[i] {
            Tier::Fumble
        } else if self.is_critical[i] {
            Tier::Critical
        } else {
            Tier::Normal
        }
    }
}

/// Base rolls and their tiers for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBatch {
    pub rolls: Vec<u32>,
    pub tiers: Tiers,
}

impl TrialBatch {
    /// Roll and classify `trials` attacks.
    pub fn new(trials: usize, advantage: AdvantageMode, crit_threshold: u32, rng: &mut impl Rng) -> Self {
        let rolls = generate(trials, advantage, rng);
        let tiers = classify(&rolls, crit_threshold);
        Self { rolls, tiers }
    }

    pub fn len(&self) -> usize {
        self.rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rolls.is_empty()
    }
}

/// Draw one base roll per trial.
///
/// Advantage and disadvantage draw two independent values per trial and keep
/// the higher or lower one.
pub fn generate(trials: usize, advantage: AdvantageMode, rng: &mut impl Rng) -> Vec<u32> {
    (0..trials)
        .map(|_| {
            let first = rng.roll(BASE_DIE);
            match advantage {
                AdvantageMode::None => first,
                AdvantageMode::Advantage => first.max(rng.roll(BASE_DIE)),
                AdvantageMode::Disadvantage => first.min(rng.roll(BASE_DIE)),
            }
        })
        .collect()
}

/// Split base rolls into tiers. A natural 1 is a fumble even when the crit
/// threshold is 1.
pub fn classify(rolls: &[u32], crit_threshold: u32) -> Tiers {
    let mut tiers = Tiers {
        is_fumble: Vec::with_capacity(rolls.len()),
        is_critical: Vec::with_capacity(rolls.len()),
        is_normal: Vec::with_capacity(rolls.len()),
    };
    for &roll in rolls {
        let fumble = roll == 1;
        let critical = roll >= crit_threshold && !fumble;
        tiers.is_fumble.push(fumble);
        tiers.is_critical.push(critical);
        tiers.is_normal.push(!(fumble || critical));
    }
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roller::{FastRng, ScriptedRng};

    #[test]
    fn test_generate_none_draws_once() {
        let mut rng = ScriptedRng::new(vec![15, 7, 3]);
        let rolls = generate(3, AdvantageMode::None, &mut rng);
        assert_eq!(rolls, vec![15, 7, 3]);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_generate_advantage_keeps_max() {
        let mut rng = ScriptedRng::new(vec![15, 7]);
        let batch = TrialBatch::new(1, AdvantageMode::Advantage, 20, &mut rng);
        assert_eq!(batch.rolls, vec![15]);
        assert_eq!(batch.tiers.tier(0), Tier::Normal);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_generate_disadvantage_keeps_min() {
        let mut rng = ScriptedRng::new(vec![15, 7, 2, 19]);
        let rolls = generate(2, AdvantageMode::Disadvantage, &mut rng);
        assert_eq!(rolls, vec![7, 2]);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_generate_range() {
        let mut rng = FastRng::with_seed(1);
        let rolls = generate(10_000, AdvantageMode::Advantage, &mut rng);
        assert!(rolls.iter().all(|r| (1..=20).contains(r)));
    }

    #[test]
    fn test_advantage_shifts_mean() {
        let mut rng = FastRng::with_seed(3);
        let mean = |rolls: Vec<u32>| rolls.iter().map(|&r| f64::from(r)).sum::<f64>() / rolls.len() as f64;
        let none = mean(generate(50_000, AdvantageMode::None, &mut rng));
        let adv = mean(generate(50_000, AdvantageMode::Advantage, &mut rng));
        let dis = mean(generate(50_000, AdvantageMode::Disadvantage, &mut rng));
        // Expected: 10.5, 13.825, 7.175
        assert!((none - 10.5).abs() < 0.2);
        assert!((adv - 13.825).abs() < 0.2);
        assert!((dis - 7.175).abs() < 0.2);
    }

    #[test]
    fn test_classify() {
        let tiers = classify(&[1, 2, 18, 19, 20], 19);
        assert_eq!(tiers.tier(0), Tier::Fumble);
        assert_eq!(tiers.tier(1), Tier::Normal);
        assert_eq!(tiers.tier(2), Tier::Normal);
        assert_eq!(tiers.tier(3), Tier::Critical);
        assert_eq!(tiers.tier(4), Tier::Critical);
    }

    #[test]
    fn test_classify_threshold_one() {
        let rolls: Vec<u32> = (1..=20).collect();
        let tiers = classify(&rolls, 1);
        assert!(tiers.is_fumble[0]);
        assert!(!tiers.is_critical[0]);
        for i in 1..20 {
            assert!(tiers.is_critical[i]);
            assert!(!tiers.is_normal[i]);
        }
    }

    #[test]
    fn test_classify_partition() {
        let rolls: Vec<u32> = (1..=20).collect();
        for threshold in 1..=20 {
            let tiers = classify(&rolls, threshold);
            assert_eq!(tiers.len(), 20);
            for i in 0..tiers.len() {
                let set = [tiers.is_fumble[i], tiers.is_critical[i], tiers.is_normal[i]];
                assert_eq!(set.iter().filter(|&&b| b).count(), 1);
            }
        }
    }
}
