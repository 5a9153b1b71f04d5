// src/core/types.rs — Core domain types

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::infra::errors::BurnishError;

/// Optimization mode. Selects strategy weights and loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Standard,
    Thorough,
    Quick,
    Creative,
    Academic,
    Technical,
    Business,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Standard,
        Mode::Thorough,
        Mode::Quick,
        Mode::Creative,
        Mode::Academic,
        Mode::Technical,
        Mode::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Thorough => "thorough",
            Mode::Quick => "quick",
            Mode::Creative => "creative",
            Mode::Academic => "academic",
            Mode::Technical => "technical",
            Mode::Business => "business",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = BurnishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Mode::Standard),
            "thorough" => Ok(Mode::Thorough),
            "quick" => Ok(Mode::Quick),
            "creative" => Ok(Mode::Creative),
            "academic" => Ok(Mode::Academic),
            "technical" => Ok(Mode::Technical),
            "business" => Ok(Mode::Business),
            other => Err(BurnishError::UnknownMode(other.into())),
        }
    }
}

/// Loop parameters for one run. Immutable value: produced by the mode table,
/// optionally overlaid with [`ParameterOverrides`], passed into each run and
/// never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopParameters {
    pub max_iterations: u32,
    pub quality_threshold: f32,
    pub convergence_limit: f32,
    pub time_limit: Duration,
    /// Widens selection to the top *two* applicable strategies per iteration.
    /// Both are still applied sequentially in priority order; there is no
    /// concurrent execution behind this flag.
    pub parallel_strategies: bool,
}

impl LoopParameters {
    /// Clamp fields into their valid ranges (`max_iterations ≥ 1`,
    /// `quality_threshold ∈ [0,1]`, `convergence_limit ≥ 0`).
    pub fn normalized(mut self) -> Self {
        self.max_iterations = self.max_iterations.max(1);
        self.quality_threshold = self.quality_threshold.clamp(0.0, 1.0);
        self.convergence_limit = self.convergence_limit.max(0.0);
        self
    }
}

/// Partial loop-parameter override. Unset fields keep the mode profile value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterOverrides {
    pub max_iterations: Option<u32>,
    pub quality_threshold: Option<f32>,
    pub convergence_limit: Option<f32>,
    pub time_limit_ms: Option<u64>,
    pub parallel_strategies: Option<bool>,
}

impl ParameterOverrides {
    pub fn apply(&self, base: LoopParameters) -> LoopParameters {
        LoopParameters {
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
            quality_threshold: self.quality_threshold.unwrap_or(base.quality_threshold),
            convergence_limit: self.convergence_limit.unwrap_or(base.convergence_limit),
            time_limit: self
                .time_limit_ms
                .map(Duration::from_millis)
                .unwrap_or(base.time_limit),
            parallel_strategies: self.parallel_strategies.unwrap_or(base.parallel_strategies),
        }
    }
}

/// Why a run stopped. Set exactly once, on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    ReachedQualityThreshold,
    ConvergenceReached,
    TimeLimit,
    NoApplicableStrategies,
    MaxIterationsReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StopReason::ReachedQualityThreshold => "reachedQualityThreshold",
            StopReason::ConvergenceReached => "convergenceReached",
            StopReason::TimeLimit => "timeLimit",
            StopReason::NoApplicableStrategies => "noApplicableStrategies",
            StopReason::MaxIterationsReached => "maxIterationsReached",
        };
        f.write_str(s)
    }
}

/// A strategy failure recorded in run metadata. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyError {
    pub strategy_id: String,
    pub message: String,
}

/// Per-run metadata: typed bookkeeping plus an opaque caller-owned map that
/// also receives strategy metadata patches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetadata {
    pub original_query: Option<String>,
    pub applied_strategies: Vec<String>,
    pub improvement_history: Vec<f32>,
    pub quality_scores: Vec<f32>,
    pub errors: Vec<StrategyError>,
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunMetadata {
    /// Merge a strategy's metadata patch into the opaque map. Later keys win.
    pub fn merge_patch(&mut self, patch: serde_json::Map<String, serde_json::Value>) {
        for (k, v) in patch {
            self.extra.insert(k, v);
        }
    }

    /// Look up a boolean flag in the opaque map.
    pub fn flag(&self, key: &str) -> bool {
        self.extra.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

/// Immutable output of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub id: String,
    pub initial_text: String,
    pub final_text: String,
    pub improved: bool,
    pub absolute_improvement: f32,
    pub percent_improvement: f32,
    pub stop_reason: StopReason,
    pub iterations: u32,
    pub metadata: RunMetadata,
    pub processing_time_ms: u64,
}

impl RunResult {
    pub fn initial_quality(&self) -> f32 {
        self.metadata.quality_scores.first().copied().unwrap_or(0.0)
    }

    pub fn final_quality(&self) -> f32 {
        self.metadata.quality_scores.last().copied().unwrap_or(0.0)
    }
}

/// Transient engine status. Reset when a run exits, however it exits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineStatus {
    pub in_progress: bool,
    /// `iteration_count / max_iterations`, in [0,1].
    pub progress: f32,
    pub current_strategy: Option<String>,
    pub estimated_remaining_ms: u64,
}

/// Observer events fired at key lifecycle transitions.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Status(EngineStatus),
    StrategyApplied {
        strategy_id: String,
        strategy_name: String,
        before: String,
        after: String,
    },
    IterationComplete {
        iteration: u32,
        text: String,
        improvement: f32,
        quality: f32,
    },
    Complete(RunResult),
}

/// Options for one `optimize` call.
#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    /// The original user query that produced the text; drives the
    /// completeness predicate.
    pub query: Option<String>,
    /// Mode for this run. Falls back to the engine's current mode.
    pub mode: Option<Mode>,
    /// Partial loop-parameter overrides layered over the mode profile.
    pub parameters: Option<ParameterOverrides>,
    /// Caller-supplied opaque metadata (e.g. the seo flag).
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
