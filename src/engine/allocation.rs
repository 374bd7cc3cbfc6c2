// src/engine/allocation.rs — Boltzmann soft-pruning budget allocation

use std::collections::BTreeMap;

/// Result of one allocation pass.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    /// Integer expansion quota per candidate.
    pub quotas: BTreeMap<String, u32>,
    /// The fractional quota each integer was rounded from, kept for
    /// reports and tests.
    pub fractional: BTreeMap<String, f64>,
}

impl Allocation {
    pub fn total(&self) -> u32 {
        self.quotas.values().sum()
    }

    /// Upper bound on the quota sum: the budget plus one unit for every
    /// candidate whose fractional share reached 1 and was rounded up.
    pub fn overshoot_bound(&self, total_child_budget: u32) -> u32 {
        let ceiled = self.fractional.values().filter(|f| **f >= 1.0).count() as u32;
        total_child_budget + ceiled
    }
}

/// Split `total_child_budget` across candidates proportionally to
/// `exp(score / T)`:
///
/// ```text
/// f(x) = budget * exp(score(x)/T) / Z,   Z = Σ_j exp(score(j)/T)
/// ```
///
/// The weights are computed with a log-sum-exp shift (max score subtracted
/// before exponentiating) so a sharp score spread at low temperature can
/// never overflow `exp`. The shift is mandatory, not an optimization.
///
/// Piecewise rounding: fractional quotas below 1 round to nearest, giving
/// low scorers a fair shot at a single unit; quotas at or above 1 round
/// up, so a candidate judged to deserve a full unit is never starved down.
/// The ceiling rule means the quota sum may overshoot the budget by at
/// most one unit per above-unity candidate — accepted and bounded, see
/// `Allocation::overshoot_bound`.
///
/// Quota 0 is the softest demotion: nothing is removed, and a later cycle
/// can revive the candidate.
pub fn allocate(
    scores: &BTreeMap<String, f64>,
    normalized_temperature: f64,
    total_child_budget: u32,
) -> Allocation {
    if scores.is_empty() {
        return Allocation::default();
    }

    let max_score = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
    let weights: BTreeMap<&String, f64> = scores
        .iter()
        .map(|(id, s)| (id, ((s - max_score) / normalized_temperature).exp()))
        .collect();
    // Z >= 1: the max-score candidate contributes exp(0).
    let z: f64 = weights.values().sum();

    let mut allocation = Allocation::default();
    for (id, w) in weights {
        let f = total_child_budget as f64 * w / z;
        let quota = if f < 1.0 { f.round() as u32 } else { f.ceil() as u32 };
        allocation.fractional.insert(id.clone(), f);
        allocation.quotas.insert(id.clone(), quota);
    }
    allocation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_of(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(id, s)| (id.to_string(), *s)).collect()
    }

    #[test]
    fn test_empty_population() {
        let a = allocate(&BTreeMap::new(), 1.0, 6);
        assert!(a.quotas.is_empty());
        assert_eq!(a.total(), 0);
    }

    #[test]
    fn test_single_candidate_gets_whole_budget() {
        let a = allocate(&scores_of(&[("only", 0.4)]), 1.0, 6);
        assert_eq!(a.quotas["only"], 6);
        assert_eq!(a.total(), 6);
    }

    #[test]
    fn test_reference_scenario() {
        // fitness [0.9, 0.5, 0.3], no bonus, T = 1.0, budget 6:
        // weights ≈ [2.4596, 1.6487, 1.3499], Z ≈ 5.4582,
        // fractional ≈ [2.70, 1.81, 1.48] → [3, 2, 2].
        let a = allocate(&scores_of(&[("a", 0.9), ("b", 0.5), ("c", 0.3)]), 1.0, 6);
        assert_eq!(a.quotas["a"], 3);
        assert_eq!(a.quotas["b"], 2);
        assert_eq!(a.quotas["c"], 2);
        assert_eq!(a.total(), 7); // one over budget: two candidates ceiled
        assert!(a.total() <= a.overshoot_bound(6));
        assert!((a.fractional["a"] - 2.70).abs() < 0.01);
        assert!((a.fractional["b"] - 1.81).abs() < 0.01);
        assert!((a.fractional["c"] - 1.48).abs() < 0.01);
    }

    #[test]
    fn test_budget_bounds() {
        let scores = scores_of(&[("a", 0.95), ("b", 0.8), ("c", 0.6), ("d", 0.2), ("e", 0.1)]);
        for budget in [1u32, 3, 6, 12, 50] {
            for t in [0.05, 0.5, 1.0, 2.0] {
                let a = allocate(&scores, t, budget);
                assert!(
                    a.total() <= a.overshoot_bound(budget),
                    "budget {budget} T {t}: total {} bound {}",
                    a.total(),
                    a.overshoot_bound(budget)
                );
                let ge_one = a.fractional.values().filter(|f| **f >= 1.0).count();
                assert!(a.total() <= budget + ge_one as u32);
            }
        }
    }

    #[test]
    fn test_low_temperature_concentrates() {
        let scores = scores_of(&[("best", 0.9), ("mid", 0.5), ("worst", 0.1)]);
        let cold = allocate(&scores, 0.05, 6);
        // At T = 0.05 the score gaps are 8+ e-folds: winner takes all.
        assert_eq!(cold.quotas["best"], 6);
        assert_eq!(cold.quotas["mid"], 0);
        assert_eq!(cold.quotas["worst"], 0);
    }

    #[test]
    fn test_high_temperature_spreads() {
        let scores = scores_of(&[("best", 0.9), ("mid", 0.5), ("worst", 0.1)]);
        let hot = allocate(&scores, 100.0, 6);
        // Near-uniform weights: everyone gets their proportional share.
        assert!(hot.quotas["worst"] >= 1);
        assert!(hot.quotas["best"] <= hot.quotas["worst"] + 1);
    }

    #[test]
    fn test_extreme_scores_no_overflow() {
        // Without the log-sum-exp shift exp(1000/0.001) would overflow.
        let scores = scores_of(&[("a", 1000.0), ("b", -1000.0)]);
        let a = allocate(&scores, 0.001, 6);
        assert_eq!(a.quotas["a"], 6);
        assert_eq!(a.quotas["b"], 0);
        for f in a.fractional.values() {
            assert!(f.is_finite());
        }
    }

    #[test]
    fn test_ties_split_evenly() {
        let a = allocate(&scores_of(&[("a", 0.5), ("b", 0.5), ("c", 0.5)]), 1.0, 6);
        assert_eq!(a.quotas["a"], 2);
        assert_eq!(a.quotas["b"], 2);
        assert_eq!(a.quotas["c"], 2);
        assert_eq!(a.total(), 6);
    }

    #[test]
    fn test_sub_unity_rounds_nearest() {
        // Ten equal candidates, budget 6: f = 0.6 each → rounds to 1.
        let scores: BTreeMap<String, f64> =
            (0..10).map(|i| (format!("c{i}"), 0.5)).collect();
        let a = allocate(&scores, 1.0, 6);
        for q in a.quotas.values() {
            assert_eq!(*q, 1);
        }
    }
}
