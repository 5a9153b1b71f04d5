// src/strategy/builtin.rs — Built-in improvement strategies
//
// Nine stateless strategies. Each pairs a cheap applicability predicate with
// an instruction composed for the rewrite collaborator. Priorities are base
// values; the mode table multiplies them at selection time.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use super::{Strategy, StrategyOutcome};
use crate::core::types::RunMetadata;
use crate::evaluator::signals;
use crate::infra::errors::BurnishError;
use crate::rewrite::Rewriter;

static FACTUAL_INDICATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(stud(y|ies)|research|according to|statistics?|percent|survey|evidence|data shows?)\b")
        .expect("valid regex")
});

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*([-*+]\s+|\d+[.)]\s+|#{1,6}\s+)").expect("valid regex"));

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(rust|python|javascript|typescript|js|ts|go|java|c|cpp|csharp|ruby|sql|bash|sh|html|css)\b")
        .expect("valid regex")
});

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((19|20)\d{2}\)|\[\d+\]").expect("valid regex"));

static MARKDOWN_TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\|.+\|\s*$").expect("valid regex"));

const REQUIREMENT_VERBS: &[&str] = &[
    "explain",
    "describe",
    "list",
    "compare",
    "analyze",
    "summarize",
    "outline",
    "evaluate",
];

const FORMAL_MARKERS: &[&str] = &[
    "therefore",
    "moreover",
    "consequently",
    "furthermore",
    "thus",
    "accordingly",
    "notwithstanding",
];

const CASUAL_MARKERS: &[&str] = &[
    "kinda",
    "gonna",
    "stuff",
    "a lot",
    "pretty much",
    "you know",
    "basically",
    "awesome",
];

/// All built-in strategies, in registration order.
pub fn all() -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(FactualAccuracy),
        Arc::new(Clarity),
        Arc::new(Completeness),
        Arc::new(CodeQuality),
        Arc::new(StructuralConsistency),
        Arc::new(ToneConsistency),
        Arc::new(CitationEnhancement),
        Arc::new(SeoEnhancement),
        Arc::new(DataVisualizationSuggestion),
    ]
}

fn count_matches(haystack_lower: &str, needles: &[&str]) -> usize {
    needles.iter().map(|n| haystack_lower.matches(n).count()).sum()
}

fn numeric_tokens(text: &str) -> usize {
    text.split_whitespace()
        .filter(|t| {
            let cleaned: String = t
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            !cleaned.is_empty()
                && cleaned.chars().any(|c| c.is_ascii_digit())
                && cleaned.parse::<f64>().is_ok()
                && t.chars().any(|c| c.is_ascii_digit())
        })
        .count()
}

// ─── clarity ────────────────────────────────────────────────────────────────

/// Splits run-on sentences. Applicable when any sentence exceeds 25 words.
pub struct Clarity;

#[async_trait]
impl Strategy for Clarity {
    fn id(&self) -> &str {
        "clarity"
    }
    fn name(&self) -> &str {
        "Clarity"
    }
    fn base_priority(&self) -> f32 {
        0.8
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        signals::sentences(text)
            .iter()
            .any(|s| s.split_whitespace().count() > 25)
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Split any sentence longer than 25 words into two or more \
                            shorter sentences. Keep the meaning, order, and terminology \
                            unchanged. Return only the revised text.";
        let out = rewriter.rewrite(text, instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}

// ─── completeness ───────────────────────────────────────────────────────────

/// Fills gaps against the original query. Applicable when the query asks more
/// than one question or stacks more than one requirement verb.
pub struct Completeness;

#[async_trait]
impl Strategy for Completeness {
    fn id(&self) -> &str {
        "completeness"
    }
    fn name(&self) -> &str {
        "Completeness"
    }
    fn base_priority(&self) -> f32 {
        0.75
    }

    fn applicable(&self, _text: &str, meta: &RunMetadata) -> bool {
        let Some(query) = meta.original_query.as_deref() else {
            return false;
        };
        let questions = query.matches('?').count();
        let verbs = count_matches(&query.to_lowercase(), REQUIREMENT_VERBS);
        questions > 1 || verbs > 1
    }

    async fn transform(
        &self,
        text: &str,
        meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let query = meta.original_query.as_deref().unwrap_or_default();
        let instructions = format!(
            "The text below was written to answer this request:\n\n{query}\n\n\
             Make sure every part of the request is addressed. Add concise \
             coverage for anything missing; do not remove existing content."
        );
        let out = rewriter.rewrite(text, &instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}

// ─── factual-accuracy ───────────────────────────────────────────────────────

/// Tightens factual claims. Applicable when factual-indicator language is
/// present.
pub struct FactualAccuracy;

#[async_trait]
impl Strategy for FactualAccuracy {
    fn id(&self) -> &str {
        "factual-accuracy"
    }
    fn name(&self) -> &str {
        "Factual accuracy"
    }
    fn base_priority(&self) -> f32 {
        0.85
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        FACTUAL_INDICATOR.is_match(text)
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Review every factual claim, statistic, and citation of \
                            research. Qualify anything unverifiable, make numbers \
                            precise, and attribute claims to their sources. Do not \
                            invent new facts.";
        let out = rewriter.rewrite(text, instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}

// ─── structural-consistency ─────────────────────────────────────────────────

/// Normalizes list and heading formatting. Applicable when any marker style
/// is detected.
pub struct StructuralConsistency;

#[async_trait]
impl Strategy for StructuralConsistency {
    fn id(&self) -> &str {
        "structural-consistency"
    }
    fn name(&self) -> &str {
        "Structural consistency"
    }
    fn base_priority(&self) -> f32 {
        0.7
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        LIST_MARKER.is_match(text)
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Normalize structure: one bullet style throughout, numbered \
                            lists only for ordered steps, heading levels nested without \
                            gaps. Content stays the same.";
        let out = rewriter.rewrite(text, instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}

// ─── code-quality ───────────────────────────────────────────────────────────

/// Improves fenced code blocks. Applicable when a fenced block with a known
/// language tag is present.
pub struct CodeQuality;

#[async_trait]
impl Strategy for CodeQuality {
    fn id(&self) -> &str {
        "code-quality"
    }
    fn name(&self) -> &str {
        "Code quality"
    }
    fn base_priority(&self) -> f32 {
        0.75
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        FENCED_CODE.is_match(text)
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Improve the code blocks only: clearer names, handle obvious \
                            error paths, remove dead code. Behavior must stay identical. \
                            Leave the prose untouched.";
        let out = rewriter.rewrite(text, instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}

// ─── tone-consistency ───────────────────────────────────────────────────────

/// Aligns tone across the text. Applicable for texts over 500 characters, and
/// only mutates when one tone clearly predominates.
pub struct ToneConsistency;

impl ToneConsistency {
    /// `Some("formal" | "casual")` when one marker set clearly dominates
    /// (at least present, and at least twice the other).
    fn predominant_tone(text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        let formal = count_matches(&lower, FORMAL_MARKERS);
        let casual = count_matches(&lower, CASUAL_MARKERS);
        if formal > 0 && formal >= casual * 2 {
            Some("formal")
        } else if casual > 0 && casual >= formal * 2 {
            Some("casual")
        } else {
            None
        }
    }
}

#[async_trait]
impl Strategy for ToneConsistency {
    fn id(&self) -> &str {
        "tone-consistency"
    }
    fn name(&self) -> &str {
        "Tone consistency"
    }
    fn base_priority(&self) -> f32 {
        0.5
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        text.chars().count() > 500
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let Some(tone) = Self::predominant_tone(text) else {
            // No clear tone to align to; leave the text alone.
            return Ok(StrategyOutcome::text_only(text));
        };

        let instructions = format!(
            "The predominant tone of this text is {tone}. Rewrite any passages \
             that deviate from that tone so the whole text reads consistently. \
             Keep all content."
        );
        let out = rewriter.rewrite(text, &instructions).await?;
        let mut patch = serde_json::Map::new();
        patch.insert("predominant_tone".into(), serde_json::json!(tone));
        Ok(StrategyOutcome {
            text: out,
            metadata_patch: patch,
        })
    }
}

// ─── citation-enhancement ───────────────────────────────────────────────────

/// Standardizes citation formatting. Applicable when parenthetical-year or
/// bracket-number citations are found.
pub struct CitationEnhancement;

#[async_trait]
impl Strategy for CitationEnhancement {
    fn id(&self) -> &str {
        "citation-enhancement"
    }
    fn name(&self) -> &str {
        "Citation enhancement"
    }
    fn base_priority(&self) -> f32 {
        0.45
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        CITATION.is_match(text)
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Standardize all citations to one style, complete partial \
                            references where the text already names the source, and \
                            keep numbering sequential. Do not fabricate references.";
        let out = rewriter.rewrite(text, instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}

// ─── data-visualization-suggestion ──────────────────────────────────────────

/// Additive-only: appends a visualization suggestion when the text is dense
/// with numbers. Lowest priority of the built-ins.
pub struct DataVisualizationSuggestion;

#[async_trait]
impl Strategy for DataVisualizationSuggestion {
    fn id(&self) -> &str {
        "data-visualization-suggestion"
    }
    fn name(&self) -> &str {
        "Data visualization suggestion"
    }
    fn base_priority(&self) -> f32 {
        0.2
    }

    fn applicable(&self, text: &str, _meta: &RunMetadata) -> bool {
        numeric_tokens(text) >= 5 || MARKDOWN_TABLE_ROW.is_match(text)
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Append one short paragraph suggesting how the numeric data \
                            in this text could be presented as a chart or table. Do not \
                            modify any existing content; only append.";
        let out = rewriter.rewrite(text, instructions).await?;
        let mut patch = serde_json::Map::new();
        patch.insert("data_visualization_suggested".into(), serde_json::json!(true));
        Ok(StrategyOutcome {
            text: out,
            metadata_patch: patch,
        })
    }
}

// ─── seo-enhancement ────────────────────────────────────────────────────────

/// Opt-in only: applicable when the caller sets the `seo` metadata flag.
pub struct SeoEnhancement;

#[async_trait]
impl Strategy for SeoEnhancement {
    fn id(&self) -> &str {
        "seo-enhancement"
    }
    fn name(&self) -> &str {
        "SEO enhancement"
    }
    fn base_priority(&self) -> f32 {
        0.4
    }

    fn applicable(&self, _text: &str, meta: &RunMetadata) -> bool {
        meta.flag("seo")
    }

    async fn transform(
        &self,
        text: &str,
        _meta: &RunMetadata,
        rewriter: &dyn Rewriter,
    ) -> Result<StrategyOutcome, BurnishError> {
        let instructions = "Improve search visibility: descriptive headings, key terms \
                            in the opening paragraph, concrete nouns over pronouns. \
                            Readability comes first; no keyword stuffing.";
        let out = rewriter.rewrite(text, instructions).await?;
        Ok(StrategyOutcome::text_only(out))
    }
}
