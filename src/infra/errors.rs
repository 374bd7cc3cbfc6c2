// src/infra/errors.rs — Error types for Strategos

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategosError {
    // Embedding provider errors (retriable)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Provider '{provider}' returned {got} embeddings for {expected} inputs")]
    EmbeddingCountMismatch {
        provider: String,
        expected: usize,
        got: usize,
    },

    // Engine invariant violations (fatal, never corrected downstream)
    #[error("Composite score invariant violated for candidate '{id}': composite {composite} < fitness {fitness}")]
    CompositeInvariant {
        id: String,
        composite: f64,
        fitness: f64,
    },

    // User errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Population file '{path}' is invalid: {message}")]
    Population { path: String, message: String },

    // Infra
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrategosError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            StrategosError::Provider {
                retriable: true,
                ..
            }
        )
    }
}
