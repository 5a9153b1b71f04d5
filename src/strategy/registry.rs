// src/strategy/registry.rs — Strategy registry
//
// Holds registered strategies and answers "which apply, in what order" for a
// given text, metadata, and mode. Read-only once the engine starts running;
// registering mid-run from another thread is the caller's problem and is
// deliberately unsupported (configure at startup).

use std::sync::Arc;

use super::{builtin, Strategy};
use crate::core::modes;
use crate::core::types::{Mode, RunMetadata};

pub struct StrategyRegistry {
    // Registration order is the tie-breaker for equal adjusted priorities,
    // so this stays a Vec rather than a map.
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl StrategyRegistry {
    /// An empty registry (for tests and fully custom setups).
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// A registry pre-populated with the nine built-in strategies.
    pub fn with_builtins() -> Self {
        let mut reg = Self::empty();
        for s in builtin::all() {
            reg.register(s);
        }
        reg
    }

    /// Register a strategy. Overwriting a live id is allowed but flagged.
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        if let Some(existing) = self
            .strategies
            .iter_mut()
            .find(|s| s.id() == strategy.id())
        {
            tracing::warn!(id = strategy.id(), "overwriting registered strategy");
            *existing = strategy;
        } else {
            self.strategies.push(strategy);
        }
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.id() == id)
    }

    /// Strategies whose predicate matches, sorted descending by
    /// `base_priority * mode_weight`. The sort is stable, so ties keep
    /// registration order; repeated calls with the same inputs return the
    /// same order.
    pub fn applicable(
        &self,
        text: &str,
        meta: &RunMetadata,
        mode: Mode,
    ) -> Vec<Arc<dyn Strategy>> {
        let mut matched: Vec<(f32, Arc<dyn Strategy>)> = self
            .strategies
            .iter()
            .filter(|s| s.applicable(text, meta))
            .map(|s| (s.base_priority() * modes::weight(mode, s.id()), s.clone()))
            .collect();

        matched.sort_by(|a, b| b.0.total_cmp(&a.0));
        matched.into_iter().map(|(_, s)| s).collect()
    }
}
