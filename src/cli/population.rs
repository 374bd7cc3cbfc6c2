// src/cli/population.rs — Population snapshot I/O

use std::path::Path;

use crate::engine::types::Candidate;
use crate::infra::errors::StrategosError;

/// Load a population snapshot: a JSON array of candidates. Missing ids are
/// minted on load; engine annotations present in the file are preserved
/// (the lifecycle is annotate-in-place, never recreate).
pub fn load(path: &Path) -> Result<Vec<Candidate>, StrategosError> {
    let raw = std::fs::read_to_string(path)?;
    let candidates: Vec<Candidate> =
        serde_json::from_str(&raw).map_err(|e| StrategosError::Population {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    for c in &candidates {
        if !(0.0..=1.0).contains(&c.fitness_score) {
            tracing::warn!(
                "Candidate '{}': fitness_score {} outside [0,1]",
                c.id,
                c.fitness_score
            );
        }
    }
    Ok(candidates)
}

/// Write the annotated population back out, pretty-printed.
pub fn save(path: &Path, candidates: &[Candidate]) -> Result<(), StrategosError> {
    let raw = serde_json::to_string_pretty(candidates)?;
    std::fs::write(path, raw)?;
    Ok(())
}
