// ABOUTME: Hit resolution against a target defense.
// ABOUTME: Criticals always hit, fumbles always miss, normal trials roll attack bonus dice.

use crate::expr::ParsedExpression;
use crate::roller::{roll_terms, Rng};
use crate::trials::{Tier, TrialBatch};

/// Decide hit or miss for every trial in the batch.
///
/// Attack bonus dice are rolled for normal trials only, so forced outcomes
/// consume no randomness. A normal trial hits when
/// `base roll + attack dice + attack modifier >= target_defense`.
pub fn resolve(
    batch: &TrialBatch,
    attack: &ParsedExpression,
    target_defense: i64,
    rng: &mut impl Rng,
) -> Vec<bool> {
    (0..batch.len())
        .map(|i| match batch.tiers.tier(i) {
            Tier::Critical => true,
            Tier::Fumble => false,
            Tier::Normal => {
                let total = i64::from(batch.rolls[i])
                    .saturating_add(roll_terms(&attack.dice, rng))
                    .saturating_add(attack.modifier);
                total >= target_defense
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::DiceTerm;
    use crate::roller::ScriptedRng;
    use crate::trials::classify;

    fn batch(rolls: Vec<u32>, crit_threshold: u32) -> TrialBatch {
        let tiers = classify(&rolls, crit_threshold);
        TrialBatch { rolls, tiers }
    }

    #[test]
    fn test_flat_modifier_miss() {
        let batch = batch(vec![10], 20);
        let attack = ParsedExpression::new(vec![], 4);
        let mut rng = ScriptedRng::new(vec![1]);
        assert_eq!(resolve(&batch, &attack, 15, &mut rng), vec![false]);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_flat_modifier_exact_hit() {
        let batch = batch(vec![11], 20);
        let attack = ParsedExpression::new(vec![], 4);
        let mut rng = ScriptedRng::new(vec![1]);
        assert_eq!(resolve(&batch, &attack, 15, &mut rng), vec![true]);
    }

    #[test]
    fn test_attack_dice_added() {
        let batch = batch(vec![10, 10], 20);
        let attack = ParsedExpression::new(vec![DiceTerm::new(1, 4)], -1);
        // 10 + 4 - 1 = 13 hits, 10 + 1 - 1 = 10 misses
        let mut rng = ScriptedRng::new(vec![4, 1]);
        assert_eq!(resolve(&batch, &attack, 13, &mut rng), vec![true, false]);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_forced_outcomes_consume_no_draws() {
        let batch = batch(vec![20, 1, 19, 1], 19);
        let attack = ParsedExpression::new(vec![DiceTerm::new(2, 6)], 100);
        let mut rng = ScriptedRng::new(vec![6]);
        let hits = resolve(&batch, &attack, 99, &mut rng);
        assert_eq!(hits, vec![true, false, true, false]);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_extreme_modifier_saturates() {
        let batch = batch(vec![10, 10], 20);
        let attack = ParsedExpression::new(vec![DiceTerm::new(1, 4)], i64::MAX);
        let mut rng = ScriptedRng::new(vec![4]);
        assert_eq!(resolve(&batch, &attack, i64::MAX, &mut rng), vec![true, true]);

        let attack = ParsedExpression::new(vec![], i64::MIN);
        assert_eq!(resolve(&batch, &attack, 0, &mut rng), vec![false, false]);
    }

    #[test]
    fn test_critical_ignores_defense() {
        let batch = batch(vec![20], 20);
        let attack = ParsedExpression::new(vec![], -50);
        let mut rng = ScriptedRng::new(vec![1]);
        assert_eq!(resolve(&batch, &attack, 1000, &mut rng), vec![true]);
    }

    #[test]
    fn test_fumble_ignores_bonus() {
        let batch = batch(vec![1], 20);
        let attack = ParsedExpression::new(vec![], 50);
        let mut rng = ScriptedRng::new(vec![1]);
        assert_eq!(resolve(&batch, &attack, 2, &mut rng), vec![false]);
    }
}
