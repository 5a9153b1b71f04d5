// src/core/controller.rs — Iteration controller
//
// Drives the refinement loop for one input: pick applicable strategies under
// the active mode, delegate the rewrite, re-score, and stop on the first of
// five conditions (quality threshold, convergence, wall clock, strategy
// exhaustion, iteration cap). Nothing in here is fatal to the process; the
// worst outcome is the original text back with errors in the metadata.

use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::modes;
use super::tracker::{PerfSnapshot, PerformanceRecord, PerformanceTracker};
use super::types::*;
use crate::evaluator::{HeuristicScorer, QualityScorer};
use crate::rewrite::Rewriter;
use crate::strategy::registry::StrategyRegistry;

/// The refinement engine. Construct one per isolated pipeline; each
/// `optimize` call owns its run state, so concurrent calls on one engine are
/// fine as long as the registry is left alone mid-run (configure strategies
/// at startup).
pub struct Optimizer {
    registry: Arc<StrategyRegistry>,
    rewriter: Arc<dyn Rewriter>,
    scorer: Box<dyn QualityScorer>,
    mode: Mutex<Mode>,
    status: Mutex<EngineStatus>,
    tracker: Mutex<PerformanceTracker>,
    status_interval: Duration,
    on_event: Option<Box<dyn Fn(EngineEvent) + Send + Sync>>,
}

impl Optimizer {
    pub fn new(registry: Arc<StrategyRegistry>, rewriter: Arc<dyn Rewriter>) -> Self {
        Self {
            registry,
            rewriter,
            scorer: Box::new(HeuristicScorer::new()),
            mode: Mutex::new(Mode::Standard),
            status: Mutex::new(EngineStatus::default()),
            tracker: Mutex::new(PerformanceTracker::new()),
            status_interval: Duration::from_millis(200),
            on_event: None,
        }
    }

    /// Replace the bundled heuristic scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn QualityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        if let Ok(mut m) = self.mode.lock() {
            *m = mode;
        }
        self
    }

    /// Minimum gap between status events (default 200ms).
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    /// Set a callback for lifecycle events.
    pub fn with_events(mut self, cb: impl Fn(EngineEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Box::new(cb));
        self
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(ref cb) = self.on_event {
            cb(event);
        }
    }

    /// Switch the engine's default mode by name. Returns false and leaves the
    /// mode unchanged when the name is unrecognized.
    pub fn set_mode(&self, name: &str) -> bool {
        match Mode::from_str(name) {
            Ok(mode) => {
                if let Ok(mut m) = self.mode.lock() {
                    *m = mode;
                }
                true
            }
            Err(_) => {
                tracing::warn!(mode = name, "ignoring unknown mode");
                false
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode.lock().map(|m| *m).unwrap_or(Mode::Standard)
    }

    /// Loop parameters the engine would use for a mode right now.
    pub fn parameters_for(&self, mode: Mode) -> LoopParameters {
        modes::profile(mode)
    }

    pub fn performance_stats(&self) -> PerfSnapshot {
        self.tracker
            .lock()
            .map(|t| t.snapshot())
            .unwrap_or_default()
    }

    pub fn status(&self) -> EngineStatus {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn score_or_default(&self, text: &str) -> f32 {
        match self.scorer.score(text) {
            Ok(s) => s.clamp(0.0, 1.0),
            Err(e) => {
                tracing::warn!("scorer failed: {e}, using neutral score");
                0.5
            }
        }
    }

    fn update_status(&self, status: EngineStatus) {
        if let Ok(mut s) = self.status.lock() {
            *s = status;
        }
    }

    /// Run the refinement loop over one input. Never fails: strategy and
    /// scorer errors are captured in the result metadata.
    pub async fn optimize(&self, text: &str, options: OptimizeOptions) -> RunResult {
        let start = Instant::now();
        let mode = options.mode.unwrap_or_else(|| self.mode());
        let base = modes::profile(mode);
        let params = options
            .parameters
            .map(|o| o.apply(base))
            .unwrap_or(base)
            .normalized();

        let mut meta = RunMetadata {
            original_query: options.query,
            extra: options.metadata,
            ..Default::default()
        };

        // Seed score before the loop
        meta.quality_scores.push(self.score_or_default(text));

        self.update_status(EngineStatus {
            in_progress: true,
            ..Default::default()
        });
        // Reset the transient status however the loop exits, including a
        // panicking event callback.
        let _status_reset = StatusReset { engine: self };

        let mut current = text.to_string();
        let mut iterations: u32 = 0;
        let mut stop_reason: Option<StopReason> = None;
        let mut last_status_emit: Option<Instant> = None;

        while iterations < params.max_iterations {
            if start.elapsed() > params.time_limit {
                stop_reason = Some(StopReason::TimeLimit);
                break;
            }

            let candidates = self.registry.applicable(&current, &meta, mode);
            if candidates.is_empty() {
                stop_reason = Some(StopReason::NoApplicableStrategies);
                break;
            }

            // The "parallel" flag only widens selection to the top two; both
            // are applied sequentially in priority order.
            let select = if params.parallel_strategies { 2 } else { 1 };
            let selected: Vec<_> = candidates.into_iter().take(select).collect();

            let status = EngineStatus {
                in_progress: true,
                progress: iterations as f32 / params.max_iterations as f32,
                current_strategy: Some(selected[0].name().to_string()),
                estimated_remaining_ms: estimate_remaining(start, iterations, &params),
            };
            self.update_status(status.clone());
            let throttled = last_status_emit
                .is_some_and(|t| t.elapsed() < self.status_interval);
            if !throttled {
                last_status_emit = Some(Instant::now());
                self.emit(EngineEvent::Status(status));
            }

            for strategy in &selected {
                match strategy
                    .transform(&current, &meta, self.rewriter.as_ref())
                    .await
                {
                    Ok(outcome) => {
                        self.emit(EngineEvent::StrategyApplied {
                            strategy_id: strategy.id().to_string(),
                            strategy_name: strategy.name().to_string(),
                            before: current.clone(),
                            after: outcome.text.clone(),
                        });
                        current = outcome.text;
                        meta.merge_patch(outcome.metadata_patch);
                        meta.applied_strategies.push(strategy.id().to_string());
                    }
                    Err(e) => {
                        // A single strategy failure never aborts the run.
                        tracing::warn!(strategy = strategy.id(), "transform failed: {e}");
                        meta.errors.push(StrategyError {
                            strategy_id: strategy.id().to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }

            let previous = meta.quality_scores.last().copied().unwrap_or(0.0);
            let quality = self.score_or_default(&current);
            let improvement = quality - previous;
            meta.quality_scores.push(quality);
            meta.improvement_history.push(improvement);
            iterations += 1;

            tracing::debug!(iteration = iterations, quality, improvement, "iteration complete");
            self.emit(EngineEvent::IterationComplete {
                iteration: iterations,
                text: current.clone(),
                improvement,
                quality,
            });

            if quality >= params.quality_threshold {
                stop_reason = Some(StopReason::ReachedQualityThreshold);
                break;
            }
            if improvement < params.convergence_limit {
                stop_reason = Some(StopReason::ConvergenceReached);
                break;
            }
        }

        let stop_reason = stop_reason.unwrap_or(StopReason::MaxIterationsReached);

        let initial_quality = meta.quality_scores.first().copied().unwrap_or(0.0);
        let final_quality = meta.quality_scores.last().copied().unwrap_or(0.0);
        let absolute = final_quality - initial_quality;
        let percent = if initial_quality == 0.0 {
            0.0
        } else {
            absolute / initial_quality * 100.0
        };

        let result = RunResult {
            id: uuid::Uuid::new_v4().to_string(),
            initial_text: text.to_string(),
            final_text: current,
            improved: absolute > 0.0,
            absolute_improvement: absolute,
            percent_improvement: percent,
            stop_reason,
            iterations,
            metadata: meta,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        if let Ok(mut tracker) = self.tracker.lock() {
            tracker.record(PerformanceRecord {
                timestamp: chrono::Utc::now(),
                processing_time_ms: result.processing_time_ms,
                iterations: result.iterations,
                initial_quality,
                final_quality,
                percent_improvement: result.percent_improvement,
                strategies_applied: result.metadata.applied_strategies.clone(),
                stop_reason,
                mode,
            });
        }

        self.emit(EngineEvent::Complete(result.clone()));
        result
    }
}

/// Rough remaining-time estimate from the average iteration cost so far.
fn estimate_remaining(start: Instant, completed: u32, params: &LoopParameters) -> u64 {
    if completed == 0 {
        return 0;
    }
    let per_iteration = start.elapsed().as_millis() as u64 / u64::from(completed);
    per_iteration * u64::from(params.max_iterations - completed)
}

struct StatusReset<'a> {
    engine: &'a Optimizer,
}

impl Drop for StatusReset<'_> {
    fn drop(&mut self) {
        self.engine.update_status(EngineStatus::default());
    }
}
