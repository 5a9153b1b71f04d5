// src/core/modes.rs — Mode profile table
//
// Pure lookups: each mode maps to a LoopParameters profile and a set of
// strategy weight multipliers. Anything absent from the weight table is 1.0.

use std::time::Duration;

use super::types::{LoopParameters, Mode};

/// Loop parameters for a mode.
pub fn profile(mode: Mode) -> LoopParameters {
    match mode {
        Mode::Standard => LoopParameters {
            max_iterations: 5,
            quality_threshold: 0.9,
            convergence_limit: 0.01,
            time_limit: Duration::from_millis(8_000),
            parallel_strategies: false,
        },
        Mode::Thorough => LoopParameters {
            max_iterations: 8,
            quality_threshold: 0.92,
            convergence_limit: 0.005,
            time_limit: Duration::from_millis(12_000),
            parallel_strategies: true,
        },
        Mode::Quick => LoopParameters {
            max_iterations: 3,
            quality_threshold: 0.85,
            convergence_limit: 0.02,
            time_limit: Duration::from_millis(5_000),
            parallel_strategies: false,
        },
        Mode::Creative => LoopParameters {
            max_iterations: 6,
            quality_threshold: 0.88,
            convergence_limit: 0.01,
            time_limit: Duration::from_millis(10_000),
            parallel_strategies: false,
        },
        Mode::Academic => LoopParameters {
            max_iterations: 7,
            quality_threshold: 0.92,
            convergence_limit: 0.008,
            time_limit: Duration::from_millis(12_000),
            parallel_strategies: false,
        },
        Mode::Technical => LoopParameters {
            max_iterations: 6,
            quality_threshold: 0.9,
            convergence_limit: 0.01,
            time_limit: Duration::from_millis(10_000),
            parallel_strategies: false,
        },
        Mode::Business => LoopParameters {
            max_iterations: 5,
            quality_threshold: 0.88,
            convergence_limit: 0.01,
            time_limit: Duration::from_millis(8_000),
            parallel_strategies: false,
        },
    }
}

/// Priority multiplier for a strategy under a mode. 1.0 when the pair is not
/// in the table.
pub fn weight(mode: Mode, strategy_id: &str) -> f32 {
    let entry = match mode {
        Mode::Standard => None,
        Mode::Thorough => match strategy_id {
            "factual-accuracy" => Some(1.2),
            "completeness" => Some(1.1),
            _ => None,
        },
        Mode::Quick => match strategy_id {
            "clarity" => Some(1.1),
            "data-visualization-suggestion" => Some(0.5),
            _ => None,
        },
        Mode::Creative => match strategy_id {
            "tone-consistency" => Some(1.5),
            "clarity" => Some(1.2),
            "code-quality" => Some(0.6),
            _ => None,
        },
        Mode::Academic => match strategy_id {
            "citation-enhancement" => Some(1.6),
            "factual-accuracy" => Some(1.4),
            "structural-consistency" => Some(1.2),
            _ => None,
        },
        Mode::Technical => match strategy_id {
            "code-quality" => Some(1.5),
            "structural-consistency" => Some(1.2),
            "tone-consistency" => Some(0.7),
            _ => None,
        },
        Mode::Business => match strategy_id {
            "completeness" => Some(1.2),
            "data-visualization-suggestion" => Some(1.3),
            "clarity" => Some(1.1),
            _ => None,
        },
    };
    entry.unwrap_or(1.0)
}
