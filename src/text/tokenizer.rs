//! Sentence and word segmentation.
//!
//! Sentences are returned as slices of the input so that every downstream
//! artifact can be traced back to the exact span it came from. Word tokens
//! carry their byte span for the same reason.

use super::stopwords::is_stopword;

/// Minimum length (exclusive) for a word to be considered topical.
const MIN_QUALIFYING_LEN: usize = 4;

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "no", "fig",
];

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of alphanumeric characters, possibly joined by `'` or `-`.
    Word,
    /// Any other non-whitespace character run.
    Punct,
}

/// A lexical unit with its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Surface form, original casing.
    pub text: &'a str,
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl<'a> Token<'a> {
    /// Lowercased form.
    pub fn normalized(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Split text into tokens, punctuation included.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |idx: usize| chars.get(idx).map(|(b, _)| *b).unwrap_or(text.len());

    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let kind = if c.is_alphanumeric() {
            while j < chars.len() {
                let next = chars[j].1;
                if next.is_alphanumeric() {
                    j += 1;
                } else if is_joiner(next)
                    && chars.get(j + 1).is_some_and(|(_, after)| after.is_alphanumeric())
                {
                    j += 2;
                } else {
                    break;
                }
            }
            TokenKind::Word
        } else {
            while j < chars.len() && chars[j].1 == c {
                j += 1;
            }
            TokenKind::Punct
        };

        let end = byte_at(j);
        tokens.push(Token {
            text: &text[start..end],
            kind,
            start,
            end,
        });
        i = j;
    }

    tokens
}

/// Lowercased tokens of the text, punctuation included.
pub fn words(text: &str) -> Vec<String> {
    tokenize(text).iter().map(Token::normalized).collect()
}

/// Split text into sentences. Each sentence is a trimmed slice of `text`.
pub fn sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |idx: usize| chars.get(idx).map(|(b, _)| *b).unwrap_or(text.len());

    let mut result = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !is_terminator(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && is_terminator(chars[j].1) {
            j += 1;
        }
        let single_period = c == '.' && j == i + 1;
        while j < chars.len() && is_closer(chars[j].1) {
            j += 1;
        }

        let at_boundary = j == chars.len() || chars[j].1.is_whitespace();
        if at_boundary && !(single_period && ends_with_abbreviation(&text[start..pos])) {
            let end = byte_at(j);
            push_trimmed(&mut result, &text[start..end]);
            start = end;
        }
        i = j;
    }

    push_trimmed(&mut result, &text[start..]);
    result
}

/// A token that is alphanumeric and not a stopword.
pub fn is_content_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric) && !is_stopword(token)
}

/// A content word long enough and alphabetic enough to carry topical signal.
///
/// These are the candidates for quiz blanks, distractors and flashcard terms.
pub fn is_qualifying_word(token: &str) -> bool {
    token.chars().count() > MIN_QUALIFYING_LEN
        && token.chars().all(char::is_alphabetic)
        && !is_stopword(token)
}

/// Qualifying words of the text in order of appearance, original casing.
pub fn qualifying_words(text: &str) -> Vec<&str> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.is_word() && is_qualifying_word(t.text))
        .map(|t| t.text)
        .collect()
}

fn is_joiner(c: char) -> bool {
    matches!(c, '\'' | '-' | '\u{2019}')
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}')
}

fn ends_with_abbreviation(prefix: &str) -> bool {
    let Some(last) = prefix.split_whitespace().last() else {
        return false;
    };
    let last = last.trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = last.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        // Initials such as "J. K. Rowling".
        return c.is_uppercase();
    }

    let lower = last.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, span: &'a str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        out.push(trimmed);
    }
}
