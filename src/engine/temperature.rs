// src/engine/temperature.rs — Adaptive exploration temperature

use super::types::EvolutionState;

/// Floor for the normalized temperature. Keeps division by temperature in
/// the allocation engine safe even when the population has fully collapsed.
pub const TEMPERATURE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    /// Raw annealed temperature before clamping.
    pub effective: f64,
    /// Clamped to `[TEMPERATURE_EPSILON, t_max]`; always strictly positive.
    pub normalized: f64,
    /// The historical peak entropy the current value was measured against.
    pub reference_entropy: f64,
}

/// Self-relative annealing schedule:
///
/// ```text
/// effective = t_max * clamp(H / H_ref, 0, 1) ^ gamma
/// ```
///
/// `H_ref` is the maximum entropy seen so far this run (or the current
/// value on the first cycle, when history is empty). Entropy near its own
/// historical peak keeps temperature near `t_max` (explore); a population
/// converging relative to its own history cools down and sharpens the
/// allocation (exploit). The schedule is deliberately self-relative: raw
/// entropy magnitudes in high-dimensional embedding spaces are not
/// comparable across problems.
///
/// Reads only the *previous* state; committing the new entropy into the
/// history is a separate step (`advance`).
pub fn read(spatial_entropy: f64, state: &EvolutionState) -> TemperatureReading {
    let t_max = state.config.t_max;
    let historical_peak = state
        .entropy_history
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let reference = if state.entropy_history.is_empty() {
        spatial_entropy
    } else {
        historical_peak.max(spatial_entropy)
    };

    let ratio = if reference > 0.0 {
        (spatial_entropy / reference).clamp(0.0, 1.0)
    } else {
        // Entropy has never risen above zero; no anneal signal exists.
        1.0
    };

    let effective = t_max * ratio.powf(state.config.gamma);
    TemperatureReading {
        effective,
        normalized: effective.clamp(TEMPERATURE_EPSILON, t_max),
        reference_entropy: reference,
    }
}

/// Commit this cycle's entropy: append to the history and bump the
/// iteration counter. The single place cross-iteration state is mutated;
/// the coordinator calls it exactly once per cycle, after every component
/// has read the previous state.
pub fn advance(state: &mut EvolutionState, spatial_entropy: f64) {
    state.entropy_history.push(spatial_entropy);
    state.iteration_count += 1;
}
