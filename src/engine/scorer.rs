// src/engine/scorer.rs — Bandit-style composite scoring

use std::collections::BTreeMap;

use crate::infra::errors::StrategosError;

use super::density::DensityField;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    /// Min-max normalized novelty signal in [0,1]; near 1 for outliers.
    pub exploration_bonus: f64,
    /// `fitness + c_explore * T * bonus`; never below fitness.
    pub composite: f64,
}

/// Score every active candidate:
///
/// ```text
/// p_rel(x)  = density(x) / max density over the population
/// bonus(x)  = minmax(1 / sqrt(p_rel(x)))          — in [0,1]
/// score(x)  = fitness(x) + c_explore * T * bonus(x)
/// ```
///
/// Low relative density marks a novel candidate and earns a bonus near 1.
/// With fewer than two density points min-max scaling is undefined and the
/// bonus is 0 — no exploration signal is measurable from one sample.
/// Candidates absent from the density field (embedding missing or failed)
/// receive the population's minimum bonus.
///
/// The defining invariant is `composite >= fitness` for every candidate;
/// the inputs make it structurally true, and a violation (a NaN leaking
/// through, a formula regression) is reported as a fatal engine error
/// rather than corrected.
pub fn score(
    actives: &[(String, f64)],
    field: &DensityField,
    c_explore: f64,
    normalized_temperature: f64,
    min_density_epsilon: f64,
) -> Result<BTreeMap<String, CompositeScore>, StrategosError> {
    let bonuses = exploration_bonuses(field, min_density_epsilon);
    let fallback_bonus = bonuses.values().copied().fold(f64::INFINITY, f64::min);
    let fallback_bonus = if fallback_bonus.is_finite() {
        fallback_bonus
    } else {
        0.0
    };

    let mut scores = BTreeMap::new();
    for (id, fitness) in actives {
        let bonus = bonuses.get(id).copied().unwrap_or(fallback_bonus);
        let composite = fitness + c_explore * normalized_temperature * bonus;
        if !(composite >= *fitness) {
            return Err(StrategosError::CompositeInvariant {
                id: id.clone(),
                composite,
                fitness: *fitness,
            });
        }
        scores.insert(
            id.clone(),
            CompositeScore {
                exploration_bonus: bonus,
                composite,
            },
        );
    }
    Ok(scores)
}

/// Per-candidate exploration bonus, min-max scaled to [0,1].
fn exploration_bonuses(field: &DensityField, min_density_epsilon: f64) -> BTreeMap<String, f64> {
    if field.len() < 2 {
        return field.points.keys().map(|id| (id.clone(), 0.0)).collect();
    }

    let max_density = field
        .max_density()
        .unwrap_or(min_density_epsilon)
        .max(min_density_epsilon);

    // Raw novelty: 1/sqrt(relative density), >= 1, larger for outliers.
    let raw: BTreeMap<String, f64> = field
        .points
        .iter()
        .map(|(id, p)| {
            let p_rel = (p.density / max_density).max(min_density_epsilon);
            (id.clone(), 1.0 / p_rel.sqrt())
        })
        .collect();

    let lo = raw.values().copied().fold(f64::INFINITY, f64::min);
    let hi = raw.values().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo <= f64::EPSILON {
        // Identical densities: no novelty signal, everyone ties at 0.
        return raw.keys().map(|id| (id.clone(), 0.0)).collect();
    }

    raw.into_iter()
        .map(|(id, v)| (id, (v - lo) / (hi - lo)))
        .collect()
}
