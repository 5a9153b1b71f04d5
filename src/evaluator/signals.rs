// src/evaluator/signals.rs — Heuristic quality signals
//
// Four approximations over raw text: average sentence length, vocabulary
// richness, structural consistency, and coherence. Each returns a value the
// composite scorer weights; none of them pretends to be real linguistics.

use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").expect("valid regex"));

static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+").expect("valid regex"));

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid regex"));

const TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "moreover",
    "furthermore",
    "consequently",
    "additionally",
    "meanwhile",
    "nevertheless",
    "thus",
    "hence",
    "finally",
    "in addition",
    "for example",
    "in contrast",
    "as a result",
    "on the other hand",
];

/// Split text into sentences on `[.!?]+` boundaries.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Mean whitespace tokens per sentence. 0.0 for empty text.
pub fn avg_sentence_len(text: &str) -> f32 {
    let sents = sentences(text);
    if sents.is_empty() {
        return 0.0;
    }
    let total: usize = sents.iter().map(|s| s.split_whitespace().count()).sum();
    total as f32 / sents.len() as f32
}

/// Unique-word ratio rescaled so 0.3 → 0.0 and 0.7 → 1.0, clamped.
/// Texts under 10 tokens are too short to judge and default to 0.5.
pub fn vocabulary_richness(text: &str) -> f32 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() < 10 {
        return 0.5;
    }

    let unique: std::collections::HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let ratio = unique.len() as f32 / tokens.len() as f32;
    ((ratio - 0.3) / 0.4).clamp(0.0, 1.0)
}

/// 0.7 when no list markers are present, 0.9 when exactly one marker style is
/// used, 0.6 when styles are mixed.
pub fn structure_consistency(text: &str) -> f32 {
    let styles = [
        BULLET_MARKER.is_match(text),
        NUMBER_MARKER.is_match(text),
        HEADING_MARKER.is_match(text),
    ]
    .iter()
    .filter(|&&m| m)
    .count();

    match styles {
        0 => 0.7,
        1 => 0.9,
        _ => 0.6,
    }
}

/// Transition-word density per paragraph, rescaled so ~1.5 transitions per
/// paragraph → 1.0, floored at 0.3. Single-paragraph text defaults to 0.6.
pub fn coherence(text: &str) -> f32 {
    let paragraphs: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.len() <= 1 {
        return 0.6;
    }

    let lower = text.to_lowercase();
    let transitions: usize = TRANSITION_WORDS
        .iter()
        .map(|w| lower.matches(w).count())
        .sum();

    let density = transitions as f32 / paragraphs.len() as f32;
    (density / 1.5).clamp(0.3, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_basic() {
        let s = sentences("One. Two! Three? Four");
        assert_eq!(s, vec!["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn test_sentences_collapsed_punctuation() {
        let s = sentences("Really?! Yes... maybe.");
        assert_eq!(s, vec!["Really", "Yes", "maybe"]);
    }

    #[test]
    fn test_avg_sentence_len() {
        // 3 tokens + 5 tokens over 2 sentences
        let len = avg_sentence_len("one two three. one two three four five.");
        assert!((len - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_avg_sentence_len_empty() {
        assert_eq!(avg_sentence_len(""), 0.0);
        assert_eq!(avg_sentence_len("..."), 0.0);
    }

    #[test]
    fn test_avg_sentence_len_no_terminator() {
        // The whole text counts as one sentence
        assert_eq!(avg_sentence_len("no punctuation here"), 3.0);
    }

    #[test]
    fn test_vocabulary_short_text_default() {
        assert_eq!(vocabulary_richness("too short to score"), 0.5);
    }

    #[test]
    fn test_vocabulary_all_unique() {
        // 12 distinct tokens → ratio 1.0 → rescaled and clamped to 1.0
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        assert_eq!(vocabulary_richness(text), 1.0);
    }

    #[test]
    fn test_vocabulary_repetitive() {
        // One word repeated 12 times → ratio ~0.083 → below 0.3 → 0.0
        let text = "word word word word word word word word word word word word";
        assert_eq!(vocabulary_richness(text), 0.0);
    }

    #[test]
    fn test_vocabulary_case_and_punct_folded() {
        // "Word" and "word," count as the same token
        let text = "Word word, word. word word word word word word word word word";
        assert_eq!(vocabulary_richness(text), 0.0);
    }

    #[test]
    fn test_structure_no_markers() {
        assert_eq!(structure_consistency("Plain prose with no lists."), 0.7);
    }

    #[test]
    fn test_structure_single_style() {
        let text = "Intro\n- one\n- two\n- three";
        assert_eq!(structure_consistency(text), 0.9);
    }

    #[test]
    fn test_structure_mixed_styles() {
        let text = "# Heading\n- bullet\n1. numbered";
        assert_eq!(structure_consistency(text), 0.6);
    }

    #[test]
    fn test_coherence_single_paragraph_default() {
        assert_eq!(coherence("Just one paragraph of text."), 0.6);
    }

    #[test]
    fn test_coherence_floor() {
        let text = "First paragraph with no connectors.\n\nSecond paragraph, equally blunt.";
        assert_eq!(coherence(text), 0.3);
    }

    #[test]
    fn test_coherence_rich_transitions() {
        let text = "However, we start. Therefore we continue. Moreover, more.\n\n\
                    Furthermore, this goes on. Consequently, it ends. Thus done.";
        assert_eq!(coherence(text), 1.0);
    }
}
