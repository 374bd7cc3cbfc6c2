// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::types::{AllocationWeighting, EvolutionConfig};
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub embedder: EmbedderConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// The `[engine]` section. One field per knob of the evolution engine,
/// fully enumerated — no free-form key lookups. Defaults match
/// `EvolutionConfig::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_iterations: u32,
    pub entropy_change_threshold: f64,
    pub total_child_budget: u32,
    pub t_max: f64,
    pub c_explore: f64,
    pub gamma: f64,
    pub min_density_epsilon: f64,
    /// Which score feeds the Boltzmann weights: "composite" or "fitness".
    pub allocation_weighting: AllocationWeighting,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let d = EvolutionConfig::default();
        Self {
            max_iterations: d.max_iterations,
            entropy_change_threshold: d.entropy_change_threshold,
            total_child_budget: d.total_child_budget,
            t_max: d.t_max,
            c_explore: d.c_explore,
            gamma: d.gamma,
            min_density_epsilon: d.min_density_epsilon,
            allocation_weighting: d.allocation_weighting,
        }
    }
}

impl From<&EngineConfig> for EvolutionConfig {
    fn from(c: &EngineConfig) -> Self {
        Self {
            max_iterations: c.max_iterations,
            entropy_change_threshold: c.entropy_change_threshold,
            total_child_budget: c.total_child_budget,
            t_max: c.t_max,
            c_explore: c.c_explore,
            gamma: c.gamma,
            min_density_epsilon: c.min_density_epsilon,
            allocation_weighting: c.allocation_weighting,
        }
    }
}

/// The `[embedder]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    /// "mock" (deterministic, offline) or "openai" (any /embeddings-compatible API).
    pub kind: String,
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key for HTTP embedders.
    pub api_key_env: String,
    /// Embedding dimension for the mock embedder.
    pub dimension: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            kind: "mock".into(),
            model: "text-embedding-3-small".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            dimension: 64,
        }
    }
}

/// The `[run]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Append one JSON line per completed cycle to this file under runs/.
    pub history_file: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            history_file: Some("cycle-history.jsonl".into()),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config at {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Serialize the current config (used by `strategos init`).
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
