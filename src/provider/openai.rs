// src/provider/openai.rs — OpenAI-compatible /embeddings client

use async_trait::async_trait;

use super::EmbeddingProvider;
use crate::infra::errors::StrategosError;

/// HTTP embedder for any OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, base_url: String, model: String, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
            dimension,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn id(&self) -> &str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StrategosError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| StrategosError::Provider {
                provider: "openai".into(),
                message: e.to_string(),
                retriable: e.is_timeout(),
            })?;

        let resp: serde_json::Value =
            response.json().await.map_err(|e| StrategosError::Provider {
                provider: "openai".into(),
                message: format!("Failed to parse embedding response: {}", e),
                retriable: false,
            })?;

        let embeddings: Vec<Vec<f32>> = resp["data"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .map(|d| {
                d["embedding"]
                    .as_array()
                    .unwrap_or(&vec![])
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                    .collect()
            })
            .collect();

        if embeddings.len() != texts.len() {
            return Err(StrategosError::EmbeddingCountMismatch {
                provider: "openai".into(),
                expected: texts.len(),
                got: embeddings.len(),
            });
        }

        Ok(embeddings)
    }
}
