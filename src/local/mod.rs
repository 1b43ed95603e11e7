//! Local fallback generation engine.
//!
//! Produces analyses, quizzes and flashcards from lexical statistics alone,
//! for use when no hosted model is configured or the hosted call fails.
//! Every artifact is assembled from sentences and words that occur in the
//! input; nothing is invented.

mod flashcards;
mod quiz;
mod summarizer;

pub use flashcards::generate_flashcards;
pub use quiz::generate_quiz;
pub use summarizer::analyze;

use crate::text::qualifying_words;

/// Fewer sentences than this cannot support a quiz or a deck.
pub(crate) const MIN_SENTENCES: usize = 3;

/// Qualifying words of `text` in first-seen order, deduplicated
/// case-insensitively. The first surface form wins.
pub(crate) fn distinct_qualifying(text: &str) -> Vec<&str> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();
    for word in qualifying_words(text) {
        let lower = word.to_lowercase();
        if !seen.contains(&lower) {
            seen.push(lower);
            result.push(word);
        }
    }
    result
}

pub(crate) fn same_word(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_qualifying_dedupes_case_insensitively() {
        assert_eq!(
            distinct_qualifying("Plants need water. plants grow. PLANTS thrive quickly."),
            vec!["Plants", "water", "thrive", "quickly"]
        );
    }
}
