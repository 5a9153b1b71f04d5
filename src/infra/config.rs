// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::core::types::ParameterOverrides;
use crate::infra::errors::BurnishError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    /// Per-mode loop-parameter overrides, keyed by mode name
    /// (e.g. `[modes.thorough]`). Layered over the built-in profiles.
    #[serde(default)]
    pub modes: HashMap<String, ModeOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_mode: String,
    /// Hard per-call timeout for the rewrite collaborator.
    pub rewrite_timeout_ms: u64,
    /// Minimum gap between status events.
    pub status_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_mode: "standard".into(),
            rewrite_timeout_ms: 30_000,
            status_interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeOverride {
    pub max_iterations: Option<u32>,
    pub quality_threshold: Option<f32>,
    pub convergence_limit: Option<f32>,
    pub time_limit_ms: Option<u64>,
    pub parallel_strategies: Option<bool>,
}

impl From<&ModeOverride> for ParameterOverrides {
    fn from(m: &ModeOverride) -> Self {
        Self {
            max_iterations: m.max_iterations,
            quality_threshold: m.quality_threshold,
            convergence_limit: m.convergence_limit,
            time_limit_ms: m.time_limit_ms,
            parallel_strategies: m.parallel_strategies,
        }
    }
}

impl Config {
    /// Load from `burnish.toml` in the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, BurnishError> {
        let path = Path::new("burnish.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, BurnishError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| BurnishError::Config(e.to_string()))
    }
}
