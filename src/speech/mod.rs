//! Speech-to-text for voice notes.

mod whisper;

pub use whisper::WhisperSpeech;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Turns an audio file into text.
///
/// Implementations return `StudyError::SpeechRecognition` when the audio
/// contains no intelligible speech and `StudyError::SpeechUnavailable` when
/// the recognition service cannot be reached.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
