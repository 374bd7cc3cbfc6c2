// src/provider/mock.rs — Deterministic offline embedder

use async_trait::async_trait;

use super::EmbeddingProvider;
use crate::infra::errors::StrategosError;

/// Hash-seeded embedder: the same text always maps to the same unit
/// vector, distinct texts land far apart. No network, no randomness —
/// exactly what the engine's determinism contract needs in tests and
/// offline runs.
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut state = fnv1a(text.as_bytes());
        let mut v: Vec<f32> = (0..self.dimension)
            .map(|_| {
                state = xorshift(state);
                // Top 53 bits → [0,1) → [-1,1)
                (state >> 11) as f32 / (1u64 << 53) as f32 * 2.0 - 1.0
            })
            .collect();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in v.iter_mut() {
                *x /= norm;
            }
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn id(&self) -> &str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StrategosError> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = MockEmbedder::new(16);
        let a = embedder.embed(&["explore parameter sweeps"]).await.unwrap();
        let b = embedder.embed(&["explore parameter sweeps"]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_distinct_texts_differ() {
        let embedder = MockEmbedder::new(16);
        let out = embedder.embed(&["strategy a", "strategy b"]).await.unwrap();
        assert_ne!(out[0], out[1]);
    }

    #[tokio::test]
    async fn test_unit_norm_and_dimension() {
        let embedder = MockEmbedder::new(32);
        let out = embedder.embed(&["anything"]).await.unwrap();
        assert_eq!(out[0].len(), 32);
        let norm: f32 = out[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
