//! Lexical services shared by the local generators.
//!
//! Everything here is pure and deterministic: empty input yields empty
//! output, never an error.

mod frequency;
mod stopwords;
mod tokenizer;

pub use frequency::{top_concepts, FrequencyTable};
pub use stopwords::is_stopword;
pub use tokenizer::{
    is_content_word, is_qualifying_word, qualifying_words, sentences, tokenize, words, Token,
    TokenKind,
};
