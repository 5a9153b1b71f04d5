// src/evaluator/mod.rs — Quality scoring

pub mod signals;

use serde::Serialize;

/// Pluggable scorer over raw text. The engine only depends on this trait, so
/// stronger analyzers can replace the bundled heuristics without touching the
/// controller. Scores are clamped to [0,1].
pub trait QualityScorer: Send + Sync {
    fn score(&self, text: &str) -> anyhow::Result<f32>;
}

/// The bundled heuristic scorer: a fixed weighted sum of four text signals.
///
/// ```text
/// score = 0.35*coherence + 0.25*(1 - min(1, avg_sentence_len/30))
///       + 0.20*vocabulary + 0.20*structure
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

const W_COHERENCE: f32 = 0.35;
const W_SENTENCE: f32 = 0.25;
const W_VOCABULARY: f32 = 0.20;
const W_STRUCTURE: f32 = 0.20;

/// Per-signal breakdown, for diagnostics and the `score` CLI command.
#[derive(Debug, Clone, Serialize)]
pub struct QualityBreakdown {
    pub avg_sentence_len: f32,
    pub sentence_score: f32,
    pub vocabulary: f32,
    pub structure: f32,
    pub coherence: f32,
    pub composite: f32,
}

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn breakdown(&self, text: &str) -> QualityBreakdown {
        let avg_len = signals::avg_sentence_len(text);
        let sentence_score = 1.0 - (avg_len / 30.0).min(1.0);
        let vocabulary = signals::vocabulary_richness(text);
        let structure = signals::structure_consistency(text);
        let coherence = signals::coherence(text);

        let composite = (W_COHERENCE * coherence
            + W_SENTENCE * sentence_score
            + W_VOCABULARY * vocabulary
            + W_STRUCTURE * structure)
            .clamp(0.0, 1.0);

        QualityBreakdown {
            avg_sentence_len: avg_len,
            sentence_score,
            vocabulary,
            structure,
            coherence,
            composite,
        }
    }
}

impl QualityScorer for HeuristicScorer {
    fn score(&self, text: &str) -> anyhow::Result<f32> {
        Ok(self.breakdown(text).composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_in_unit_interval() {
        let scorer = HeuristicScorer::new();
        for text in [
            "",
            "Short.",
            "A much longer piece of text. It has several sentences! Does it score? Yes.",
            "- bullet\n- bullet\n\nHowever, prose too.",
        ] {
            let s = scorer.score(text).unwrap();
            assert!((0.0..=1.0).contains(&s), "score {s} for {text:?}");
        }
    }

    #[test]
    fn test_breakdown_weights_sum_to_composite() {
        let scorer = HeuristicScorer::new();
        let b = scorer.breakdown("One two three four. Five six seven eight.");
        let expected = 0.35 * b.coherence
            + 0.25 * b.sentence_score
            + 0.20 * b.vocabulary
            + 0.20 * b.structure;
        assert!((b.composite - expected.clamp(0.0, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_long_sentences_score_lower() {
        let scorer = HeuristicScorer::new();
        let short = "We ran the test. It passed. We shipped it. Everyone was glad.";
        let long = "We ran the test and then after considerable internal deliberation \
                    among all of the many people who were somehow involved in the \
                    process it eventually passed and we finally shipped the thing to \
                    production where everyone was reasonably glad about the outcome.";
        let s_short = scorer.breakdown(short).sentence_score;
        let s_long = scorer.breakdown(long).sentence_score;
        assert!(s_short > s_long);
    }

    #[test]
    fn test_sentence_score_floor_at_zero() {
        // avg length beyond 30 tokens clamps the ratio at 1.0
        let words = vec!["word"; 80].join(" ");
        let b = HeuristicScorer::new().breakdown(&words);
        assert_eq!(b.sentence_score, 0.0);
    }

    #[test]
    fn test_empty_text_scores_midrange() {
        // coherence 0.6, sentence 1.0, vocab 0.5, structure 0.7
        let s = HeuristicScorer::new().score("").unwrap();
        assert!((s - 0.7).abs() < 1e-6);
    }
}
