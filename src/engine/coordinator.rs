// src/engine/coordinator.rs — One evolution cycle, start to finish

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::infra::errors::StrategosError;
use crate::provider::EmbeddingProvider;

use super::allocation;
use super::convergence::{self, ConvergenceDecision, StopReason};
use super::density;
use super::entropy;
use super::scorer;
use super::temperature;
use super::types::{AllocationWeighting, Candidate, CycleReport, EvolutionState};

/// Sequences the pipeline exactly once per cycle: embedding barrier →
/// density → entropy → temperature → composite scores → allocation →
/// state commit → convergence. Every stage after the barrier is
/// synchronous and deterministic.
pub struct IterationCoordinator {
    provider: Arc<dyn EmbeddingProvider>,
}

impl IterationCoordinator {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Run one full cycle: embed whatever is missing, then evaluate the
    /// frozen population. Candidate annotations and the run state are
    /// only written if the whole cycle succeeds; an error leaves every
    /// prior-iteration value untouched.
    pub async fn run_cycle(
        &self,
        candidates: &mut [Candidate],
        state: &mut EvolutionState,
    ) -> Result<CycleReport, StrategosError> {
        self.embed_missing(candidates).await;
        run_cycle_frozen(candidates, state)
    }

    /// Embedding barrier: one batched provider call for every active
    /// candidate that still lacks a vector. A provider failure excludes
    /// the affected candidates from this cycle's density field (they keep
    /// fitness and get the minimum exploration bonus) — logged, never
    /// fatal.
    async fn embed_missing(&self, candidates: &mut [Candidate]) {
        let missing: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.active && c.embedding.is_none())
            .map(|(i, _)| i)
            .collect();
        if missing.is_empty() {
            return;
        }

        let texts: Vec<String> = missing.iter().map(|&i| candidates[i].text.clone()).collect();
        let refs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
        tracing::debug!("Embedding {} candidates", refs.len());

        match self.provider.embed(&refs).await {
            Ok(vectors) => {
                // Embedding dimensionality is constant across a run: the
                // population's existing vectors are authoritative, falling
                // back to this batch's first vector.
                let expected = candidates
                    .iter()
                    .find_map(|c| c.embedding.as_ref().map(|e| e.len()))
                    .or_else(|| vectors.first().map(|v| v.len()))
                    .unwrap_or(0);
                for (&i, vector) in missing.iter().zip(vectors) {
                    if vector.len() != expected {
                        tracing::warn!(
                            "Candidate '{}': embedding dimension {} != {}, excluding from density",
                            candidates[i].id,
                            vector.len(),
                            expected
                        );
                        continue;
                    }
                    candidates[i].embedding = Some(vector);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Embedding provider '{}' failed ({}); {} candidates excluded this cycle",
                    self.provider.id(),
                    e,
                    refs.len()
                );
            }
        }
    }
}

/// Evaluate one cycle over an already-embedded population snapshot.
///
/// This is the deterministic core: identical candidates, state, and
/// config reproduce every output bit for bit. Annotations are staged in
/// local maps and committed together with the state advance only after
/// every fallible step has passed.
pub fn run_cycle_frozen(
    candidates: &mut [Candidate],
    state: &mut EvolutionState,
) -> Result<CycleReport, StrategosError> {
    let config = state.config.clone();

    let active: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.active)
        .map(|(i, _)| i)
        .collect();

    // Short-circuit: nothing to evolve, nothing to mutate.
    if active.is_empty() {
        tracing::info!("No active candidates; population exhausted");
        return Ok(CycleReport {
            iteration: state.iteration_count,
            spatial_entropy: 0.0,
            effective_temperature: 0.0,
            normalized_temperature: 0.0,
            bandwidth: None,
            active_candidates: 0,
            embedding_failures: 0,
            quota_total: 0,
            convergence: ConvergenceDecision::Stop(StopReason::PopulationExhausted),
            completed_at: Utc::now(),
        });
    }

    // Density over the embedded subset.
    let points: Vec<(String, Vec<f32>)> = active
        .iter()
        .filter_map(|&i| {
            candidates[i]
                .embedding
                .as_ref()
                .map(|e| (candidates[i].id.clone(), e.clone()))
        })
        .collect();
    let embedding_failures = active.len() - points.len();
    let field = density::estimate(&points, config.min_density_epsilon);

    let spatial_entropy = entropy::spatial_entropy(&field);

    // Temperature reads the previous history; the commit happens below.
    let reading = temperature::read(spatial_entropy, state);

    let fitness: Vec<(String, f64)> = active
        .iter()
        .map(|&i| (candidates[i].id.clone(), candidates[i].fitness_score))
        .collect();
    let scores = scorer::score(
        &fitness,
        &field,
        config.c_explore,
        reading.normalized,
        config.min_density_epsilon,
    )?;

    let weights: BTreeMap<String, f64> = match config.allocation_weighting {
        AllocationWeighting::Composite => scores
            .iter()
            .map(|(id, s)| (id.clone(), s.composite))
            .collect(),
        AllocationWeighting::Fitness => fitness.iter().cloned().collect(),
    };
    let allocation = allocation::allocate(&weights, reading.normalized, config.total_child_budget);

    // Commit: annotations first, then the single cross-iteration mutation.
    for &i in &active {
        let candidate = &mut candidates[i];
        let point = field.points.get(&candidate.id);
        candidate.density = point.map(|p| p.density);
        candidate.log_density = point.map(|p| p.log_density);
        candidate.composite_score = scores.get(&candidate.id).map(|s| s.composite);
        candidate.expansion_quota = allocation.quotas.get(&candidate.id).copied();
    }
    temperature::advance(state, spatial_entropy);

    let convergence = convergence::evaluate(state, active.len());
    let quota_total = allocation.total();

    tracing::info!(
        "Cycle {}: entropy {:.4}, T {:.4}, quota {}/{}, {:?}",
        state.iteration_count,
        spatial_entropy,
        reading.normalized,
        quota_total,
        config.total_child_budget,
        convergence
    );

    Ok(CycleReport {
        iteration: state.iteration_count,
        spatial_entropy,
        effective_temperature: reading.effective,
        normalized_temperature: reading.normalized,
        bandwidth: field.bandwidth,
        active_candidates: active.len(),
        embedding_failures,
        quota_total,
        convergence,
        completed_at: Utc::now(),
    })
}
