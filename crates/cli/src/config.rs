use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serve::RetryConfig;
use std::path::Path;
use transcript::{ExhaustionPolicy, Language, DEFAULT_NEGATIVE_PROBABILITY};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub language: Language,
    pub prepare: PrepareConfig,
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    pub negative_sampling: bool,
    pub negative_probability: f64,
    /// Fixed seed for reproducible runs; fresh entropy when unset
    pub seed: Option<u64>,
    /// Number of most frequent entity types to log after counting
    pub top_k: usize,
    pub on_exhausted: ExhaustionPolicy,
    /// Log progress every this many records (0 disables)
    pub progress_every: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub model: String,
    pub max_new_tokens: u32,
    pub retry: RetryConfig,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            negative_sampling: false,
            negative_probability: DEFAULT_NEGATIVE_PROBABILITY,
            seed: None,
            top_k: 10,
            on_exhausted: ExhaustionPolicy::Fail,
            progress_every: 10_000,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "uniner-7b-type".to_string(),
            max_new_tokens: 256,
            retry: RetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid with the JSON file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config file: {:?}", path))
    }
}
