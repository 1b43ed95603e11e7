//! OpenAI Whisper speech recognition.

use super::SpeechToText;
use crate::config::SpeechSettings;
use crate::error::{Result, StudyError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Whisper-based speech recognizer.
pub struct WhisperSpeech {
    client: Client<OpenAIConfig>,
    model: String,
    language: Option<String>,
}

impl WhisperSpeech {
    pub fn new(settings: &SpeechSettings, api_key: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client(api_key, timeout)?,
            model: settings.model.clone(),
            language: settings.language.clone(),
        })
    }
}

#[async_trait]
impl SpeechToText for WhisperSpeech {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let file_bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("voice_note.wav")
            .to_string();

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(file_name, file_bytes))
            .model(&self.model);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| StudyError::SpeechUnavailable(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| StudyError::SpeechUnavailable(format!("Whisper API error: {}", e)))?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(StudyError::SpeechRecognition(
                "no speech detected, please speak clearly".to_string(),
            ));
        }

        debug!("Transcribed {} characters", text.len());
        Ok(text)
    }
}
