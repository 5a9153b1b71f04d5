// src/core/tracker.rs — Aggregate run statistics
//
// Diagnostics only. The controller records one entry per completed run and
// never reads anything back for control flow.

use std::collections::HashMap;
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{Mode, StopReason};

const HISTORY_CAP: usize = 100;

/// One completed run.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceRecord {
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub iterations: u32,
    pub initial_quality: f32,
    pub final_quality: f32,
    pub percent_improvement: f32,
    pub strategies_applied: Vec<String>,
    pub stop_reason: StopReason,
    pub mode: Mode,
}

/// Read-only aggregate snapshot. All zeros before the first run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerfSnapshot {
    pub average_processing_time_ms: f64,
    pub average_improvement: f32,
    pub success_rate: f32,
    pub total_optimizations: u64,
    pub average_iterations: f32,
}

#[derive(Debug, Default)]
pub struct PerformanceTracker {
    records: VecDeque<PerformanceRecord>,
    total_runs: u64,
    success_count: u64,
    /// Running average of percent improvement across successful runs.
    average_improvement: f32,
    times_by_mode: HashMap<Mode, Vec<u64>>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: PerformanceRecord) {
        self.total_runs += 1;

        // A run "succeeded" when it improved the text by more than 1%.
        if record.percent_improvement > 1.0 {
            self.success_count += 1;
            let n = self.success_count as f32;
            self.average_improvement =
                (self.average_improvement * (n - 1.0) + record.percent_improvement) / n;
        }

        self.times_by_mode
            .entry(record.mode)
            .or_default()
            .push(record.processing_time_ms);

        if self.records.len() == HISTORY_CAP {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// The retained history (most recent `HISTORY_CAP` runs, oldest first).
    pub fn history(&self) -> impl Iterator<Item = &PerformanceRecord> {
        self.records.iter()
    }

    pub fn processing_times(&self, mode: Mode) -> &[u64] {
        self.times_by_mode
            .get(&mode)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn snapshot(&self) -> PerfSnapshot {
        if self.total_runs == 0 {
            return PerfSnapshot::default();
        }

        let time_sum: u64 = self
            .times_by_mode
            .values()
            .flat_map(|v| v.iter())
            .sum();
        let time_count: usize = self.times_by_mode.values().map(Vec::len).sum();

        let iter_sum: u64 = self.records.iter().map(|r| u64::from(r.iterations)).sum();

        PerfSnapshot {
            average_processing_time_ms: time_sum as f64 / time_count.max(1) as f64,
            average_improvement: self.average_improvement,
            success_rate: self.success_count as f32 / self.total_runs as f32,
            total_optimizations: self.total_runs,
            average_iterations: iter_sum as f32 / self.records.len().max(1) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(percent: f32, ms: u64, iterations: u32, mode: Mode) -> PerformanceRecord {
        PerformanceRecord {
            timestamp: Utc::now(),
            processing_time_ms: ms,
            iterations,
            initial_quality: 0.5,
            final_quality: 0.6,
            percent_improvement: percent,
            strategies_applied: vec!["clarity".into()],
            stop_reason: StopReason::ConvergenceReached,
            mode,
        }
    }

    #[test]
    fn test_empty_snapshot_all_zero() {
        let tracker = PerformanceTracker::new();
        assert_eq!(tracker.snapshot(), PerfSnapshot::default());
    }

    #[test]
    fn test_success_threshold_is_one_percent() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(record(0.5, 10, 1, Mode::Standard)); // not a success
        tracker.record(record(1.0, 10, 1, Mode::Standard)); // still not (> 1 strictly)
        tracker.record(record(5.0, 10, 1, Mode::Standard)); // success
        let snap = tracker.snapshot();
        assert_eq!(snap.total_optimizations, 3);
        assert!((snap.success_rate - 1.0 / 3.0).abs() < 1e-6);
        assert!((snap.average_improvement - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_running_average_over_successes_only() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(record(4.0, 10, 1, Mode::Standard));
        tracker.record(record(0.0, 10, 1, Mode::Standard));
        tracker.record(record(8.0, 10, 1, Mode::Standard));
        let snap = tracker.snapshot();
        assert!((snap.average_improvement - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_history_capped_at_100() {
        let mut tracker = PerformanceTracker::new();
        for i in 0..150u64 {
            tracker.record(record(2.0, i, 1, Mode::Quick));
        }
        assert_eq!(tracker.history().count(), 100);
        // Oldest evicted first: the first retained record is run 50
        assert_eq!(tracker.history().next().unwrap().processing_time_ms, 50);
        // Aggregates still count every run
        assert_eq!(tracker.snapshot().total_optimizations, 150);
    }

    #[test]
    fn test_per_mode_times() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(record(2.0, 10, 1, Mode::Quick));
        tracker.record(record(2.0, 30, 1, Mode::Thorough));
        tracker.record(record(2.0, 20, 1, Mode::Quick));
        assert_eq!(tracker.processing_times(Mode::Quick), &[10, 20]);
        assert_eq!(tracker.processing_times(Mode::Thorough), &[30]);
        assert!(tracker.processing_times(Mode::Creative).is_empty());
    }

    #[test]
    fn test_average_iterations_and_time() {
        let mut tracker = PerformanceTracker::new();
        tracker.record(record(2.0, 100, 2, Mode::Standard));
        tracker.record(record(2.0, 300, 4, Mode::Standard));
        let snap = tracker.snapshot();
        assert!((snap.average_processing_time_ms - 200.0).abs() < 1e-9);
        assert!((snap.average_iterations - 3.0).abs() < 1e-6);
    }
}
