//! Flashcard synthesis from sampled sentences.

use super::{distinct_qualifying, same_word, MIN_SENTENCES};
use crate::error::{ContentKind, Result, StudyError};
use crate::sampling::sample_positions;
use crate::study::{Flashcard, FlashcardDeck};
use crate::text::sentences;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

const MAX_RELATED: usize = 3;

/// Build up to `count` cards, one per sampled sentence that has a key term.
pub fn generate_flashcards<R: Rng + ?Sized>(
    text: &str,
    count: usize,
    rng: &mut R,
) -> Result<FlashcardDeck> {
    let sentences = sentences(text);
    if sentences.len() < MIN_SENTENCES {
        return Err(StudyError::InsufficientContent(ContentKind::Flashcards));
    }

    let picked = sample_positions(rng, sentences.len(), count);

    let mut flashcards = Vec::with_capacity(picked.len());
    for idx in picked {
        if let Some(card) = card_for(&sentences, idx, rng) {
            flashcards.push(card);
        }
    }
    flashcards.truncate(count);

    debug!(
        "Generated {} local flashcards ({} requested)",
        flashcards.len(),
        count
    );

    Ok(FlashcardDeck { flashcards })
}

fn card_for<R: Rng + ?Sized>(
    sentences: &[&str],
    idx: usize,
    rng: &mut R,
) -> Option<Flashcard> {
    let sentence = sentences[idx];
    let candidates = distinct_qualifying(sentence);
    let term = *candidates.choose(rng)?;
    let needle = term.to_lowercase();

    let mentions = |i: usize| sentences[i].to_lowercase().contains(&needle);
    let other = |i: usize| i != idx && sentences[i] != sentence;

    let context_idx = (0..sentences.len())
        .find(|&i| other(i) && mentions(i))
        .or_else(|| {
            let rest: Vec<usize> = (0..sentences.len()).filter(|&i| other(i)).collect();
            rest.choose(rng).copied()
        });

    let example = (0..sentences.len())
        .find(|&i| {
            other(i)
                && Some(i) != context_idx
                && context_idx.map_or(true, |c| sentences[i] != sentences[c])
                && mentions(i)
        })
        .map(|i| sentences[i].to_string())
        .unwrap_or_default();

    let related_concepts = candidates
        .iter()
        .filter(|word| !same_word(word, term))
        .take(MAX_RELATED)
        .map(|word| word.to_string())
        .collect();

    Some(Flashcard {
        front: format!("Define or explain: {}", term),
        back: sentence.to_string(),
        key_term: term.to_string(),
        context: context_idx
            .map(|i| sentences[i].to_string())
            .unwrap_or_default(),
        example,
        related_concepts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{pinned, study_rng};

    const ECOLOGY: &str = "Energy flows through every ecosystem. \
        Plants capture energy from sunlight. \
        Animals obtain energy by eating plants. \
        Decomposers recycle nutrients.";

    #[test]
    fn test_too_few_sentences() {
        let mut rng = pinned();
        let result = generate_flashcards("Only one. And two.", 5, &mut rng);
        assert!(matches!(
            result,
            Err(StudyError::InsufficientContent(ContentKind::Flashcards))
        ));
    }

    #[test]
    fn test_card_with_context_and_example() {
        let mut rng = pinned();
        let deck = generate_flashcards(ECOLOGY, 1, &mut rng).unwrap();
        assert_eq!(deck.flashcards.len(), 1);

        let card = &deck.flashcards[0];
        assert_eq!(card.front, "Define or explain: Energy");
        assert_eq!(card.back, "Energy flows through every ecosystem.");
        assert_eq!(card.key_term, "Energy");
        assert_eq!(card.context, "Plants capture energy from sunlight.");
        assert_eq!(card.example, "Animals obtain energy by eating plants.");
        assert_eq!(card.related_concepts, vec!["flows", "every", "ecosystem"]);
    }

    #[test]
    fn test_unmentioned_term_falls_back_to_another_sentence() {
        let mut rng = pinned();
        let sentences = sentences(ECOLOGY);
        let card = card_for(&sentences, 3, &mut rng).unwrap();

        assert_eq!(card.key_term, "Decomposers");
        assert_eq!(card.context, "Energy flows through every ecosystem.");
        assert_eq!(card.example, "");
        assert_eq!(card.related_concepts, vec!["recycle", "nutrients"]);
    }

    #[test]
    fn test_fallback_context_skips_repeated_sentence() {
        let text = "Energy flows through every ecosystem. \
            Decomposers recycle nutrients. \
            Decomposers recycle nutrients. \
            Plants capture sunlight.";
        let sentences = sentences(text);
        for seed in 0..30 {
            let mut rng = study_rng(Some(seed));
            let card = card_for(&sentences, 1, &mut rng).unwrap();
            assert_eq!(card.back, "Decomposers recycle nutrients.");
            assert_ne!(card.context, card.back);
            assert!(card.example.is_empty());
        }
    }

    #[test]
    fn test_sentence_without_term_is_skipped() {
        let text = "It is so. Gravity bends light around massive stars. We are here.";
        let mut rng = pinned();
        let deck = generate_flashcards(text, 3, &mut rng).unwrap();
        assert_eq!(deck.flashcards.len(), 1);
        assert_eq!(deck.flashcards[0].key_term, "Gravity");
    }

    #[test]
    fn test_cards_are_traceable_to_input() {
        let sentences = sentences(ECOLOGY);
        for seed in 0..30 {
            let mut rng = study_rng(Some(seed));
            let deck = generate_flashcards(ECOLOGY, 10, &mut rng).unwrap();
            assert!(deck.flashcards.len() <= 4);

            for card in &deck.flashcards {
                assert!(sentences.contains(&card.back.as_str()));
                assert!(sentences.contains(&card.context.as_str()));
                assert_ne!(card.context, card.back);
                assert!(card.example.is_empty() || sentences.contains(&card.example.as_str()));
                assert!(card.back.contains(&card.key_term));
                assert!(card.related_concepts.len() <= MAX_RELATED);
                assert!(!card
                    .related_concepts
                    .iter()
                    .any(|word| same_word(word, &card.key_term)));
            }
        }
    }

    #[test]
    fn test_zero_requested_cards() {
        let mut rng = study_rng(Some(1));
        let deck = generate_flashcards(ECOLOGY, 0, &mut rng).unwrap();
        assert!(deck.flashcards.is_empty());
    }
}
