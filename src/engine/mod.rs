// src/engine/mod.rs — Evolutionary selection & resource-allocation engine
//
// One cycle turns a population of scored strategy candidates into a density
// field in embedding space, a spatial-entropy reading, an annealed
// temperature, a composite (fitness + exploration) score, an integer
// expansion quota per candidate, and a stop/continue decision. The pipeline
// is deterministic: identical inputs produce identical outputs in every
// field.

pub mod allocation;
pub mod convergence;
pub mod coordinator;
pub mod density;
pub mod entropy;
pub mod scorer;
pub mod temperature;
pub mod types;

pub use convergence::{ConvergenceDecision, StopReason};
pub use coordinator::IterationCoordinator;
pub use types::{AllocationWeighting, Candidate, CycleReport, EvolutionConfig, EvolutionState};
