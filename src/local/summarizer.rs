//! Frequency-based extractive analysis.

use crate::study::Analysis;
use crate::text::{sentences, top_concepts, words};

const SUMMARY_SENTENCES: usize = 3;
const KEY_CONCEPTS: usize = 10;
const MAX_KEY_POINTS: usize = 5;

/// Summarize a text without a hosted model.
///
/// The summary is the leading sentences; key points are the sentences that
/// mention one of the most frequent content words. Never fails: text with
/// no sentences yields an empty analysis.
pub fn analyze(text: &str) -> Analysis {
    let sentences = sentences(text);
    let tokens = words(text);
    let key_concepts = top_concepts(&tokens, KEY_CONCEPTS);

    let summary = sentences
        .iter()
        .take(SUMMARY_SENTENCES)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    let key_points = sentences
        .iter()
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            key_concepts.iter().any(|concept| lower.contains(concept.as_str()))
        })
        .take(MAX_KEY_POINTS)
        .map(|sentence| sentence.to_string())
        .collect();

    Analysis {
        summary,
        key_points,
        key_concepts,
        word_count: tokens.len(),
        sentence_count: sentences.len(),
        subject: None,
    }
}
