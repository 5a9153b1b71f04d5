// src/strategy/mod.rs — Improvement strategies

pub mod builtin;
pub mod registry;

use async_trait::async_trait;

use crate::core::types::RunMetadata;
use crate::infra::errors::BurnishError;
use crate::rewrite::Rewriter;

/// Result of one strategy application.
#[derive(Debug, Clone, Default)]
pub struct StrategyOutcome {
    pub text: String,
    /// Merged into the run's opaque metadata map after a successful apply.
    pub metadata_patch: serde_json::Map<String, serde_json::Value>,
}

impl StrategyOutcome {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata_patch: serde_json::Map::new(),
        }
    }
}

/// A named, stateless text-transform unit with an applicability predicate and
/// a base priority. Strategies compose rewrite instructions and delegate the
/// actual rewrite to the injected [`Rewriter`]; they must not retain
/// cross-call state.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Unique id; registry entries are keyed by this.
    fn id(&self) -> &str;

    /// Human-readable name for events and logs.
    fn name(&self) -> &str;

    /// Base priority before mode weighting. Higher runs first.
    fn base_priority(&self) -> f32;

    /// Whether this strategy has anything to do for the given text.
    fn applicable(&self, text: &str, meta: &RunMetadata) -> bool;

    /// Produce a candidate text. Failure is strategy-local: the controller
    /// records it and continues with the unmodified text.
    async fn transform(
        &self,
        text: &str,
        meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError>;
}
