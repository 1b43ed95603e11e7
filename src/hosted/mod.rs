//! Hosted language-model capability.
//!
//! The service treats the model as optional: it is only constructed when an
//! API key is configured, and every failure falls back to the local engine.

mod openai;

pub use openai::OpenAIStudyModel;

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::study::{Analysis, FlashcardDeck, Quiz, QuizType};
use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::info;

/// Generation operations backed by a hosted model.
#[async_trait]
pub trait StudyModel: Send + Sync {
    /// Model identifier, for logging.
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> Result<Analysis>;

    /// Analysis tuned for transcribed speech; reports a `subject`.
    async fn analyze_voice(&self, text: &str) -> Result<Analysis>;

    async fn quiz(&self, text: &str, quiz_type: QuizType, count: usize) -> Result<Quiz>;

    async fn flashcards(&self, text: &str, count: usize) -> Result<FlashcardDeck>;

    /// Condense a raw transcript into readable prose.
    async fn refine_transcript(&self, text: &str) -> Result<String>;
}

/// Build the hosted capability if it is enabled and an API key is set.
pub fn from_settings(settings: &Settings, prompts: Prompts) -> Result<Option<Arc<dyn StudyModel>>> {
    if !settings.model.enabled {
        info!("Hosted model disabled in settings");
        return Ok(None);
    }

    let Some(api_key) = crate::openai::api_key() else {
        info!("No {} set, using local generation only", crate::openai::API_KEY_VAR);
        return Ok(None);
    };

    let model = OpenAIStudyModel::new(&settings.model, prompts, &api_key)?;
    info!("Hosted model enabled: {}", model.name());
    Ok(Some(Arc::new(model)))
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_input(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => Cow::Owned(format!("{}...", &text[..byte])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_input() {
        assert_eq!(truncate_input("short", 10), "short");
        assert_eq!(truncate_input("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_input("abcdefghijkl", 5), "abcde...");
        // Multi-byte characters are never split.
        assert_eq!(truncate_input("héllo wörld", 7), "héllo w...");
    }

    #[test]
    fn test_disabled_model_is_absent() {
        let mut settings = Settings::default();
        settings.model.enabled = false;
        assert!(from_settings(&settings, Prompts::default()).unwrap().is_none());
    }
}
