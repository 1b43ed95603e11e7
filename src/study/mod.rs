//! Study material and the artifacts derived from it.

mod models;

pub use models::{
    Analysis, Document, Flashcard, FlashcardDeck, Quiz, QuizQuestion, QuizType, SourceKind,
};
