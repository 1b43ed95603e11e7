//! Word-frequency statistics over content words.

use super::tokenizer::is_content_word;
use std::collections::HashMap;

/// Occurrence counts of normalized content words.
///
/// Entries keep first-encountered order so that ranking is stable: among
/// words with equal counts, the one seen first ranks higher.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Build a table from a token sequence. Tokens that are not content
    /// words are ignored; the rest are lowercased before counting.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for token in tokens {
            let token = token.as_ref();
            if is_content_word(token) {
                table.add(&token.to_lowercase());
            }
        }
        table
    }

    fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), 1));
            }
        }
    }

    /// Count for a word (case-insensitive).
    pub fn count(&self, word: &str) -> usize {
        self.index
            .get(&word.to_lowercase())
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent words with their counts, ties in first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .entries
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        // sort_by is stable, which preserves first-seen order among ties
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// The `n` most frequent content words of a token sequence.
pub fn top_concepts<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<String> {
    FrequencyTable::from_tokens(tokens)
        .most_common(n)
        .into_iter()
        .map(|(word, _)| word.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::words;

    #[test]
    fn test_counts_ignore_stopwords_and_punctuation() {
        let tokens = words("The cat sat on the mat. The mat was red.");
        let table = FrequencyTable::from_tokens(&tokens);

        assert_eq!(table.count("mat"), 2);
        assert_eq!(table.count("MAT"), 2);
        assert_eq!(table.count("the"), 0);
        assert_eq!(table.count("."), 0);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_top_concepts_ties_in_first_seen_order() {
        let tokens = words("zebra apple mango apple zebra kiwi");
        assert_eq!(top_concepts(&tokens, 3), vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_top_concepts_empty_and_oversized() {
        let empty: Vec<String> = Vec::new();
        assert!(top_concepts(&empty, 10).is_empty());

        let tokens = words("alpha beta");
        assert_eq!(top_concepts(&tokens, 10), vec!["alpha", "beta"]);
    }
}
