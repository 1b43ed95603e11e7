//! Error types for Study Companion.

use thiserror::Error;

/// What a local generator was asked to produce when the input was too short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Quiz,
    Flashcards,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Quiz => write!(f, "quiz questions"),
            ContentKind::Flashcards => write!(f, "flashcards"),
        }
    }
}

/// Library-level error type for Study Companion operations.
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text is too short to generate meaningful {0}")]
    InsufficientContent(ContentKind),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("No transcript found for this video")]
    TranscriptNotFound,

    #[error("Could not understand the audio: {0}")]
    SpeechRecognition(String),

    #[error("Speech recognition service unavailable: {0}")]
    SpeechUnavailable(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

/// Result type alias for Study Companion operations.
pub type Result<T> = std::result::Result<T, StudyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_content_messages() {
        assert_eq!(
            StudyError::InsufficientContent(ContentKind::Quiz).to_string(),
            "Text is too short to generate meaningful quiz questions"
        );
        assert_eq!(
            StudyError::InsufficientContent(ContentKind::Flashcards).to_string(),
            "Text is too short to generate meaningful flashcards"
        );
    }
}
