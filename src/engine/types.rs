// src/engine/types.rs — Candidate, config, and per-run state

use serde::{Deserialize, Serialize};

use crate::infra::errors::StrategosError;

use super::convergence::ConvergenceDecision;

/// One strategy hypothesis under consideration.
///
/// Created by an external generator agent, scored by an external evaluator,
/// and annotated in place by the engine each cycle. The engine never
/// destroys a candidate and never flips `active` — demotion to quota 0 is
/// the softest form of pruning, and permanent removal is an external policy
/// decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default = "Candidate::new_id")]
    pub id: String,

    /// Lookup-only back-reference; the population forms a forest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// The strategy text this candidate proposes.
    pub text: String,

    /// Set once per cycle by the embedding barrier; immutable afterwards
    /// unless the text changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    /// Judge score in [0,1], supplied upstream. Read-only to the engine.
    #[serde(default)]
    pub fitness_score: f64,

    /// Externally owned. The engine reads it to build the working
    /// population but never writes it.
    #[serde(default = "default_active")]
    pub active: bool,

    // Engine annotations, committed atomically once per cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion_quota: Option<u32>,

    /// Opaque upstream payload (milestones, provenance, whatever the
    /// generator attaches). Round-tripped untouched.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

fn default_active() -> bool {
    true
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Self::new_id(),
            parent_id: None,
            text: text.into(),
            embedding: None,
            fitness_score: 0.0,
            active: true,
            density: None,
            log_density: None,
            composite_score: None,
            expansion_quota: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn child_of(parent_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::new(text)
        }
    }

    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Which score feeds the Boltzmann weights in the allocation engine.
///
/// `Composite` rewards both fitness and novelty and is the default;
/// `Fitness` reproduces systems that weight on the raw judge score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationWeighting {
    Composite,
    Fitness,
}

/// Immutable engine configuration, validated at state construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub max_iterations: u32,
    /// Relative entropy change below which the run is considered stable.
    pub entropy_change_threshold: f64,
    /// Total expansion units distributed per cycle.
    pub total_child_budget: u32,
    /// Temperature ceiling; also the value at peak diversity.
    pub t_max: f64,
    /// Exploration bonus weight in the composite score.
    pub c_explore: f64,
    /// Temperature sensitivity exponent.
    pub gamma: f64,
    /// Floor for densities and log-density arguments.
    pub min_density_epsilon: f64,
    pub allocation_weighting: AllocationWeighting,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            entropy_change_threshold: 0.1,
            total_child_budget: 6,
            t_max: 2.0,
            c_explore: 1.0,
            gamma: 1.0,
            min_density_epsilon: 1e-10,
            allocation_weighting: AllocationWeighting::Composite,
        }
    }
}

impl EvolutionConfig {
    /// Reject malformed configs up front, never mid-run.
    pub fn validate(&self) -> Result<(), StrategosError> {
        if self.max_iterations == 0 {
            return Err(StrategosError::Config("max_iterations must be > 0".into()));
        }
        if self.total_child_budget == 0 {
            return Err(StrategosError::Config(
                "total_child_budget must be > 0".into(),
            ));
        }
        if !(self.t_max > 0.0) {
            return Err(StrategosError::Config("t_max must be > 0".into()));
        }
        if self.c_explore < 0.0 {
            return Err(StrategosError::Config("c_explore must be >= 0".into()));
        }
        if !(self.gamma > 0.0) {
            return Err(StrategosError::Config("gamma must be > 0".into()));
        }
        if !(self.entropy_change_threshold >= 0.0) {
            return Err(StrategosError::Config(
                "entropy_change_threshold must be >= 0".into(),
            ));
        }
        if !(self.min_density_epsilon > 0.0) {
            return Err(StrategosError::Config(
                "min_density_epsilon must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Cross-iteration state for one run. An explicit value owned by the
/// orchestration loop and threaded through every call — never a process
/// global, never shared across concurrent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionState {
    /// Append-only within a run; length equals `iteration_count` after
    /// each completed cycle.
    pub entropy_history: Vec<f64>,
    pub iteration_count: u32,
    pub config: EvolutionConfig,
}

impl EvolutionState {
    pub fn new(config: EvolutionConfig) -> Result<Self, StrategosError> {
        config.validate()?;
        Ok(Self {
            entropy_history: Vec::new(),
            iteration_count: 0,
            config,
        })
    }

    pub fn previous_entropy(&self) -> Option<f64> {
        self.entropy_history.last().copied()
    }
}

/// Everything one completed cycle produced, for observability and the
/// stop/continue decision. Serialized as one JSONL line per cycle when a
/// history file is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// Iteration number after this cycle committed (1-based).
    pub iteration: u32,
    pub spatial_entropy: f64,
    pub effective_temperature: f64,
    pub normalized_temperature: f64,
    /// KDE bandwidth used this cycle; absent when fewer than two
    /// candidates were embedded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    pub active_candidates: usize,
    /// Active candidates excluded from the density field this cycle
    /// (missing or failed embedding).
    pub embedding_failures: usize,
    /// Sum of expansion quotas handed out (may exceed the budget by at
    /// most the number of above-unity fractional quotas).
    pub quota_total: u32,
    pub convergence: ConvergenceDecision,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = EvolutionConfig {
            total_child_budget: 0,
            ..Default::default()
        };
        assert!(EvolutionState::new(config).is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = EvolutionConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_t_max_rejected() {
        let config = EvolutionConfig {
            t_max: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_candidate_deserializes_with_defaults() {
        let c: Candidate = serde_json::from_str(r#"{"text": "search the literature first"}"#).unwrap();
        assert!(c.active);
        assert!(!c.id.is_empty());
        assert!(c.embedding.is_none());
        assert_eq!(c.fitness_score, 0.0);
    }

    #[test]
    fn test_payload_roundtrip_untouched() {
        let raw = r#"{"id": "c1", "text": "t", "fitness_score": 0.5, "payload": {"milestones": [1, 2], "note": "x"}}"#;
        let c: Candidate = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["payload"]["milestones"], serde_json::json!([1, 2]));
        assert_eq!(back["payload"]["note"], "x");
    }

    #[test]
    fn test_child_of_links_parent() {
        let c = Candidate::child_of("p1", "refine the baseline");
        assert_eq!(c.parent_id.as_deref(), Some("p1"));
    }
}
