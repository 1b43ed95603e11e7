//! Quiz synthesis from sampled sentences.
//!
//! The sampled pool is split into blocks: multiple-choice questions draw
//! from the first `n/2` sentences, true/false from the next `n/2`, and
//! open-ended from the `n/3` sentences starting at `2*(n/3)`. A sentence
//! that offers no candidate words produces no question.

use super::{distinct_qualifying, same_word, MIN_SENTENCES};
use crate::error::{ContentKind, Result, StudyError};
use crate::sampling::sample;
use crate::study::{Quiz, QuizQuestion, QuizType};
use crate::text::{sentences, tokenize};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

const BLANK: &str = "____";
const DISTRACTORS: usize = 3;
/// Statements need more tokens than this to be corrupted or asked about.
const MIN_STATEMENT_TOKENS: usize = 5;

/// Generate up to `count` questions of the requested type.
///
/// Fails only when the text has fewer than three sentences.
pub fn generate_quiz<R: Rng + ?Sized>(
    text: &str,
    quiz_type: QuizType,
    count: usize,
    rng: &mut R,
) -> Result<Quiz> {
    let sentences = sentences(text);
    if sentences.len() < MIN_SENTENCES {
        return Err(StudyError::InsufficientContent(ContentKind::Quiz));
    }

    let pool = sample(rng, &sentences, count.saturating_mul(2).min(sentences.len()));
    let vocabulary = distinct_qualifying(text);
    let half = count / 2;
    let third = count / 3;

    let mut questions = Vec::new();

    if quiz_type.includes(QuizType::MultipleChoice) {
        for sentence in block(&pool, 0, half) {
            if let Some(question) = multiple_choice(sentence, &vocabulary, rng) {
                questions.push(question);
            }
        }
    }

    if quiz_type.includes(QuizType::TrueFalse) {
        for sentence in block(&pool, half, half) {
            questions.push(true_false(sentence, &vocabulary, rng));
        }
    }

    if quiz_type.includes(QuizType::OpenEnded) {
        for sentence in block(&pool, 2 * third, third) {
            if let Some(question) = open_ended(sentence, rng) {
                questions.push(question);
            }
        }
    }

    questions.truncate(count);
    debug!(
        "Generated {} local questions ({} requested, {} sentences)",
        questions.len(),
        count,
        sentences.len()
    );

    Ok(Quiz { questions })
}

fn block<'p, 'a>(pool: &'p [&'a str], start: usize, len: usize) -> &'p [&'a str] {
    let start = start.min(pool.len());
    let end = start.saturating_add(len).min(pool.len());
    &pool[start..end]
}

/// Blank out one qualifying word and offer it among distractors.
fn multiple_choice<R: Rng + ?Sized>(
    sentence: &str,
    vocabulary: &[&str],
    rng: &mut R,
) -> Option<QuizQuestion> {
    let candidates = distinct_qualifying(sentence);
    let answer = *candidates.choose(rng)?;

    let same_sentence: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|word| !same_word(word, answer))
        .collect();
    let mut distractors = sample(rng, &same_sentence, DISTRACTORS);

    if distractors.len() < DISTRACTORS {
        let elsewhere: Vec<&str> = vocabulary
            .iter()
            .copied()
            .filter(|word| !same_word(word, answer))
            .filter(|word| !distractors.iter().any(|d| same_word(d, word)))
            .collect();
        let needed = DISTRACTORS - distractors.len();
        distractors.extend(sample(rng, &elsewhere, needed));
    }

    let mut options: Vec<String> = std::iter::once(answer)
        .chain(distractors)
        .map(str::to_string)
        .collect();
    options.shuffle(rng);

    Some(QuizQuestion::MultipleChoice {
        question: blank_out(sentence, answer),
        options,
        answer: answer.to_string(),
        explanation: None,
    })
}

/// Replace the first token equal to `word` with the blank marker.
fn blank_out(sentence: &str, word: &str) -> String {
    match tokenize(sentence).into_iter().find(|t| t.text == word) {
        Some(token) => format!("{}{}{}", &sentence[..token.start], BLANK, &sentence[token.end..]),
        None => sentence.replacen(word, BLANK, 1),
    }
}

/// Emit the sentence as a true statement, or a corrupted copy as false.
///
/// Sentences too short to corrupt are always emitted as true, which skews
/// short-sentence documents towards true statements.
fn true_false<R: Rng + ?Sized>(
    sentence: &str,
    vocabulary: &[&str],
    rng: &mut R,
) -> QuizQuestion {
    let corrupted = if rng.gen_bool(0.5) {
        corrupt(sentence, vocabulary, rng)
    } else {
        None
    };

    match corrupted {
        Some(question) => QuizQuestion::TrueFalse {
            question,
            answer: false,
            explanation: None,
        },
        None => QuizQuestion::TrueFalse {
            question: sentence.to_string(),
            answer: true,
            explanation: None,
        },
    }
}

/// Swap one interior word for another qualifying word of the document.
/// The first two words and the last word are never touched; punctuation
/// does not count as a word.
fn corrupt<R: Rng + ?Sized>(
    sentence: &str,
    vocabulary: &[&str],
    rng: &mut R,
) -> Option<String> {
    let tokens = tokenize(sentence);
    if tokens.len() <= MIN_STATEMENT_TOKENS {
        return None;
    }

    let word_positions: Vec<usize> = (0..tokens.len())
        .filter(|&i| tokens[i].is_word())
        .collect();
    let eligible = word_positions.get(2..word_positions.len().saturating_sub(1))?;
    let target = &tokens[*eligible.choose(rng)?];

    let replacements: Vec<&str> = vocabulary
        .iter()
        .copied()
        .filter(|word| !same_word(word, target.text))
        .collect();
    let replacement = replacements.choose(rng)?;

    Some(format!(
        "{}{}{}",
        &sentence[..target.start],
        replacement,
        &sentence[target.end..]
    ))
}

fn open_ended<R: Rng + ?Sized>(sentence: &str, rng: &mut R) -> Option<QuizQuestion> {
    if tokenize(sentence).len() <= MIN_STATEMENT_TOKENS {
        return None;
    }

    let candidates = distinct_qualifying(sentence);
    let word = candidates.choose(rng)?;

    Some(QuizQuestion::OpenEnded {
        question: format!("What is the significance of '{}' in the given context?", word),
        context: sentence.to_string(),
        suggested_answer: format!(
            "The term '{}' in this context refers to an important concept related to the subject matter.",
            word
        ),
        key_points: Vec::new(),
    })
}
