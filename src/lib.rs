//! Study Companion - summaries, quizzes and flashcards from study material
//!
//! Turns text, PDFs, YouTube transcripts and voice notes into study aids.
//!
//! # Overview
//!
//! Every operation prefers a hosted model (OpenAI) when an API key is
//! configured and falls back to a local engine that needs no network:
//! - Summaries with key points and key concepts
//! - Multiple-choice, true/false and open-ended quiz questions
//! - Flashcards with context, examples and related concepts
//!
//! # Architecture
//!
//! - `text` - Tokenization, stopwords and word frequencies
//! - `local` - Local summarizer, quiz and flashcard synthesizers
//! - `hosted` - Hosted-model abstraction and the OpenAI implementation
//! - `transcript` - YouTube caption fetching and normalization
//! - `extract` - PDF text extraction
//! - `audio` / `speech` - Voice-note conversion and speech-to-text
//! - `service` - Dispatch between hosted and local engines
//! - `cli` - Command line and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use study_companion::config::Settings;
//! use study_companion::service::StudyService;
//! use study_companion::study::{QuizType, SourceKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = StudyService::new(Settings::load()?)?;
//!
//!     let text = std::fs::read_to_string("notes.txt")?;
//!     let quiz = service.quiz(&text, QuizType::All, 5, SourceKind::Text).await?;
//!     println!("Generated {} questions", quiz.questions.len());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod hosted;
pub mod local;
pub mod openai;
pub mod sampling;
pub mod service;
pub mod speech;
pub mod study;
pub mod text;
pub mod transcript;

pub use error::{Result, StudyError};
