// src/engine/convergence.rs — Stop/continue decision

use serde::{Deserialize, Serialize};

use super::types::EvolutionState;

/// Why a run stopped. Serialized snake_case for report consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxIterationsReached,
    EntropyStable,
    PopulationExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum ConvergenceDecision {
    Continue,
    Stop(StopReason),
}

impl ConvergenceDecision {
    pub fn is_stop(&self) -> bool {
        matches!(self, ConvergenceDecision::Stop(_))
    }
}

/// Evaluate the stop conditions after a completed cycle. The state has
/// already been advanced, so `iteration_count` counts this cycle and the
/// history ends with this cycle's entropy.
///
/// Stops when any of these holds:
/// 1. The iteration budget is spent.
/// 2. Entropy moved less than `entropy_change_threshold` relative to the
///    previous cycle. Never fires on the first completed cycle — there is
///    no prior value to compare against, and that is a design rule, not
///    an oversight.
/// 3. No active candidates remain.
///
/// Engine annotations are committed before this runs; a STOP never rolls
/// anything back.
pub fn evaluate(state: &EvolutionState, active_count: usize) -> ConvergenceDecision {
    if active_count == 0 {
        return ConvergenceDecision::Stop(StopReason::PopulationExhausted);
    }

    if state.iteration_count >= state.config.max_iterations {
        return ConvergenceDecision::Stop(StopReason::MaxIterationsReached);
    }

    if state.iteration_count > 1 {
        let n = state.entropy_history.len();
        let current = state.entropy_history[n - 1];
        let previous = state.entropy_history[n - 2];
        let relative_change = (current - previous).abs() / previous.abs().max(1.0);
        if relative_change < state.config.entropy_change_threshold {
            return ConvergenceDecision::Stop(StopReason::EntropyStable);
        }
    }

    ConvergenceDecision::Continue
}
