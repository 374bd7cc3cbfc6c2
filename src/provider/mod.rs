// src/provider/mod.rs — Embedding provider layer

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;

use crate::infra::config::EmbedderConfig;
use crate::infra::errors::StrategosError;

/// Maps strategy text to fixed-dimension vectors. The engine only ever
/// consumes vectors; providers are injectable and a deterministic mock
/// stands in for tests and offline runs.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Dimension of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts. Must return exactly one vector per input,
    /// in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StrategosError>;
}

/// Build a provider from the `[embedder]` config section.
pub fn from_config(config: &EmbedderConfig) -> Result<Arc<dyn EmbeddingProvider>, StrategosError> {
    match config.kind.as_str() {
        "mock" => Ok(Arc::new(mock::MockEmbedder::new(config.dimension))),
        "openai" => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                StrategosError::Config(format!(
                    "embedder kind 'openai' requires the {} environment variable",
                    config.api_key_env
                ))
            })?;
            Ok(Arc::new(openai::OpenAiEmbedder::new(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
                config.dimension,
            )))
        }
        other => Err(StrategosError::Config(format!(
            "unknown embedder kind '{other}' (expected 'mock' or 'openai')"
        ))),
    }
}
