//! Request dispatch for Study Companion.
//!
//! Every operation prefers the hosted model and falls back to the local
//! engine when the model is absent or fails. Only the local engine's
//! `InsufficientContent` and input errors reach the caller.

use crate::audio::{convert_to_wav, decode_audio_payload, ffmpeg_available, install_hint};
use crate::config::{Prompts, Settings};
use crate::error::{Result, StudyError};
use crate::extract::extract_pdf_text;
use crate::hosted::{self, truncate_input, StudyModel};
use crate::local;
use crate::sampling::study_rng;
use crate::speech::{SpeechToText, WhisperSpeech};
use crate::study::{Analysis, Document, FlashcardDeck, Quiz, QuizType, SourceKind};
use crate::transcript::{normalize, parse_video_id, TranscriptFetcher, YtDlpTranscripts};
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// An analysis plus whatever the source adds to it.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    #[serde(flatten)]
    pub analysis: Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Length of the extracted transcript, in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_successful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_missing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_message: Option<String>,
}

impl ProcessedDocument {
    fn new(analysis: Analysis) -> Self {
        Self {
            analysis,
            source: None,
            full_text: None,
            video_id: None,
            transcript_size: None,
            text_preview: None,
            conversion_successful: None,
            ffmpeg_missing: None,
            ffmpeg_message: None,
        }
    }
}

/// Transcription of a voice note returned without analysis.
#[derive(Debug, Clone, Serialize)]
pub struct VoicePreview {
    pub source: String,
    pub full_text: String,
    pub transcript_size: usize,
    pub conversion_successful: bool,
    pub ffmpeg_missing: bool,
    pub ffmpeg_message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum VoiceOutcome {
    Preview(VoicePreview),
    Analyzed(ProcessedDocument),
}

/// Dispatches study requests to the hosted model or the local engine.
pub struct StudyService {
    settings: Settings,
    model: Option<Arc<dyn StudyModel>>,
    transcripts: Arc<dyn TranscriptFetcher>,
    speech: Option<Arc<dyn SpeechToText>>,
    seed: Option<u64>,
}

impl StudyService {
    /// Build the service and its collaborators from settings and the environment.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model = hosted::from_settings(&settings, prompts)?;
        let transcripts: Arc<dyn TranscriptFetcher> =
            Arc::new(YtDlpTranscripts::new(settings.youtube.languages.clone()));

        let speech: Option<Arc<dyn SpeechToText>> = match crate::openai::api_key() {
            Some(key) => Some(Arc::new(WhisperSpeech::new(
                &settings.speech,
                &key,
                Duration::from_secs(settings.model.timeout_seconds),
            )?)),
            None => None,
        };

        Ok(Self::with_components(settings, model, transcripts, speech))
    }

    /// Create a service with custom components.
    pub fn with_components(
        settings: Settings,
        model: Option<Arc<dyn StudyModel>>,
        transcripts: Arc<dyn TranscriptFetcher>,
        speech: Option<Arc<dyn SpeechToText>>,
    ) -> Self {
        Self {
            settings,
            model,
            transcripts,
            speech,
            seed: None,
        }
    }

    /// Make local generation deterministic.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a hosted model is configured.
    pub fn ai_powered(&self) -> bool {
        self.model.is_some()
    }

    fn rng(&self) -> StdRng {
        study_rng(self.seed)
    }

    /// Analyze a document. Never fails: the local engine is the last resort.
    #[instrument(skip_all, fields(source = %document.source()))]
    pub async fn analyze(&self, document: &Document) -> Analysis {
        if let Some(model) = &self.model {
            if document.source() == SourceKind::Voice {
                match model.analyze_voice(document.content()).await {
                    Ok(analysis) => return analysis,
                    Err(e) => warn!("Voice analysis with {} failed: {}", model.name(), e),
                }
            }

            info!("Analyzing with {}", model.name());
            match model.analyze(document.content()).await {
                Ok(analysis) => return analysis,
                Err(e) => warn!("Hosted analysis failed, falling back to local: {}", e),
            }
        }

        info!("Analyzing locally");
        local::analyze(document.content())
    }

    /// Generate a quiz. YouTube text is refined by the hosted model first.
    #[instrument(skip(self, text))]
    pub async fn quiz(
        &self,
        text: &str,
        quiz_type: QuizType,
        count: usize,
        source: SourceKind,
    ) -> Result<Quiz> {
        let text = self.prepare(text, source).await;

        if let Some(model) = &self.model {
            info!("Generating quiz with {}", model.name());
            match model.quiz(&text, quiz_type, count).await {
                Ok(quiz) => return Ok(quiz),
                Err(e) => warn!("Hosted quiz generation failed, falling back to local: {}", e),
            }
        }

        info!("Generating quiz locally");
        local::generate_quiz(&text, quiz_type, count, &mut self.rng())
    }

    /// Generate flashcards. YouTube text is refined by the hosted model first.
    #[instrument(skip(self, text))]
    pub async fn flashcards(
        &self,
        text: &str,
        count: usize,
        source: SourceKind,
    ) -> Result<FlashcardDeck> {
        let text = self.prepare(text, source).await;

        if let Some(model) = &self.model {
            info!("Generating flashcards with {}", model.name());
            match model.flashcards(&text, count).await {
                Ok(deck) => return Ok(deck),
                Err(e) => warn!("Hosted flashcard generation failed, falling back to local: {}", e),
            }
        }

        info!("Generating flashcards locally");
        local::generate_flashcards(&text, count, &mut self.rng())
    }

    async fn prepare(&self, text: &str, source: SourceKind) -> String {
        if source == SourceKind::Youtube {
            if let Some(refined) = self.refine(text).await {
                return refined;
            }
        }
        text.to_string()
    }

    /// Refined transcript, or `None` without a model or on failure.
    async fn refine(&self, text: &str) -> Option<String> {
        let model = self.model.as_ref()?;
        match model.refine_transcript(text).await {
            Ok(refined) => Some(refined),
            Err(e) => {
                warn!("Transcript refinement failed, using raw transcript: {}", e);
                None
            }
        }
    }

    /// Analyze submitted text.
    pub async fn process_text(&self, text: &str) -> ProcessedDocument {
        let analysis = self.analyze(&Document::text(text)).await;
        let mut result = ProcessedDocument::new(analysis);
        result.full_text = Some(text.to_string());
        result
    }

    /// Extract and analyze an uploaded PDF.
    pub async fn process_pdf(&self, bytes: Vec<u8>) -> Result<ProcessedDocument> {
        let document = Document::new(extract_pdf_text(bytes).await?, SourceKind::Pdf);
        info!("Extracted {} characters from PDF", document.char_len());

        let analysis = self.analyze(&document).await;
        let mut result = ProcessedDocument::new(analysis);
        result.source = Some("pdf".to_string());
        result.full_text = Some(document.content().to_string());
        Ok(result)
    }

    /// Fetch and normalize a video's transcript.
    pub async fn transcript(&self, video_url: &str) -> Result<(String, String)> {
        let video_id = parse_video_id(video_url)
            .ok_or_else(|| StudyError::InvalidInput("Invalid YouTube URL format".to_string()))?;

        let entries = self.transcripts.fetch(&video_id).await?;
        Ok((video_id, normalize(&entries)))
    }

    /// Analyze a video's transcript. The response carries a preview
    /// instead of the full text.
    #[instrument(skip(self))]
    pub async fn process_youtube(&self, video_url: &str) -> Result<ProcessedDocument> {
        let (video_id, transcript) = self.transcript(video_url).await?;
        let transcript_size = transcript.chars().count();
        info!("YouTube transcript size: {} characters", transcript_size);

        let analysis_text = truncate_input(&transcript, self.settings.model.max_input_chars);
        let analysis = self
            .analyze(&Document::new(&*analysis_text, SourceKind::Youtube))
            .await;

        let preview_chars = self.settings.generation.preview_chars;
        let text_preview = match self.refine(&analysis_text).await {
            Some(refined) => truncate_input(&refined, preview_chars).into_owned(),
            None => truncate_input(&transcript, preview_chars).into_owned(),
        };

        let mut result = ProcessedDocument::new(analysis);
        result.source = Some("youtube".to_string());
        result.video_id = Some(video_id);
        result.transcript_size = Some(transcript_size);
        result.text_preview = Some(text_preview);
        Ok(result)
    }

    /// Transcribe a base64 voice note and, unless `preview_only`, analyze it.
    #[instrument(skip(self, audio_data))]
    pub async fn process_voice(&self, audio_data: &str, preview_only: bool) -> Result<VoiceOutcome> {
        let bytes = decode_audio_payload(audio_data)?;
        let speech = self.speech.as_ref().ok_or_else(|| {
            StudyError::SpeechUnavailable(format!(
                "no speech-to-text service configured (set {})",
                crate::openai::API_KEY_VAR
            ))
        })?;

        let temp_root = self.temp_dir();
        tokio::fs::create_dir_all(&temp_root).await?;
        let workdir = tempfile::Builder::new()
            .prefix("voice-")
            .tempdir_in(&temp_root)?;

        let upload = workdir.path().join("voice_note.webm");
        tokio::fs::write(&upload, &bytes).await?;
        debug!("Saved {} bytes of audio", bytes.len());

        let (audio_path, converted) = if self.settings.speech.convert_with_ffmpeg
            && ffmpeg_available().await
        {
            match convert_to_wav(&upload).await {
                Ok(wav) => (wav, true),
                Err(e) => {
                    warn!("Audio conversion failed, sending original file: {}", e);
                    (upload, false)
                }
            }
        } else {
            (upload, false)
        };

        let text = speech.transcribe(&audio_path).await?;
        let transcript_size = text.chars().count();
        info!("Transcribed voice note: {} characters", transcript_size);
        let ffmpeg_message = format!(
            "For full voice note functionality, please install ffmpeg on your system and ensure it's in the PATH. {}",
            if converted { "" } else { install_hint() }
        );

        if preview_only {
            return Ok(VoiceOutcome::Preview(VoicePreview {
                source: "voice_note_preview".to_string(),
                full_text: text,
                transcript_size,
                conversion_successful: converted,
                ffmpeg_missing: !converted,
                ffmpeg_message: ffmpeg_message.trim_end().to_string(),
            }));
        }

        let analysis = self
            .analyze(&Document::new(text.as_str(), SourceKind::Voice))
            .await;

        let mut result = ProcessedDocument::new(analysis);
        result.source = Some("voice_note".to_string());
        result.text_preview =
            Some(truncate_input(&text, self.settings.generation.preview_chars).into_owned());
        result.full_text = Some(text);
        result.transcript_size = Some(transcript_size);
        result.conversion_successful = Some(converted);
        if !converted {
            result.ffmpeg_missing = Some(true);
            result.ffmpeg_message = Some(ffmpeg_message);
        }
        Ok(VoiceOutcome::Analyzed(result))
    }

    fn temp_dir(&self) -> PathBuf {
        self.settings.temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentKind;
    use crate::study::{Flashcard, QuizQuestion};
    use crate::transcript::TranscriptEntry;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use std::path::Path;
    use std::sync::Mutex;

    const LESSON: &str = "Photosynthesis converts sunlight into chemical energy. \
        Chlorophyll absorbs light inside plant leaves. \
        Glucose molecules store energy for later cellular processes. \
        Oxygen escapes through small pores called stomata.";

    /// A model whose every call fails.
    struct BrokenModel;

    #[async_trait]
    impl StudyModel for BrokenModel {
        fn name(&self) -> &str {
            "broken"
        }
        async fn analyze(&self, _text: &str) -> Result<Analysis> {
            Err(StudyError::Model("down".to_string()))
        }
        async fn analyze_voice(&self, _text: &str) -> Result<Analysis> {
            Err(StudyError::Model("down".to_string()))
        }
        async fn quiz(&self, _text: &str, _t: QuizType, _n: usize) -> Result<Quiz> {
            Err(StudyError::OpenAI("timeout".to_string()))
        }
        async fn flashcards(&self, _text: &str, _n: usize) -> Result<FlashcardDeck> {
            Err(StudyError::OpenAI("timeout".to_string()))
        }
        async fn refine_transcript(&self, _text: &str) -> Result<String> {
            Err(StudyError::Model("down".to_string()))
        }
    }

    /// A model with canned answers that records the text it was given.
    #[derive(Default)]
    struct CannedModel {
        voice_fails: bool,
        seen: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn record(&self, call: &str, text: &str) {
            self.seen.lock().unwrap().push(format!("{call}:{text}"));
        }
    }

    #[async_trait]
    impl StudyModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }
        async fn analyze(&self, text: &str) -> Result<Analysis> {
            self.record("analyze", text);
            Ok(Analysis {
                summary: "hosted summary".to_string(),
                ..Analysis::default()
            })
        }
        async fn analyze_voice(&self, text: &str) -> Result<Analysis> {
            self.record("voice", text);
            if self.voice_fails {
                return Err(StudyError::Model("bad json".to_string()));
            }
            Ok(Analysis {
                summary: "voice summary".to_string(),
                subject: Some("biology".to_string()),
                ..Analysis::default()
            })
        }
        async fn quiz(&self, text: &str, _t: QuizType, _n: usize) -> Result<Quiz> {
            self.record("quiz", text);
            Ok(Quiz {
                questions: vec![QuizQuestion::TrueFalse {
                    question: "Hosted?".to_string(),
                    answer: true,
                    explanation: None,
                }],
            })
        }
        async fn flashcards(&self, text: &str, _n: usize) -> Result<FlashcardDeck> {
            self.record("flashcards", text);
            Ok(FlashcardDeck {
                flashcards: vec![Flashcard {
                    front: "f".to_string(),
                    back: "b".to_string(),
                    key_term: "k".to_string(),
                    context: String::new(),
                    example: String::new(),
                    related_concepts: Vec::new(),
                }],
            })
        }
        async fn refine_transcript(&self, _text: &str) -> Result<String> {
            Ok("REFINED TRANSCRIPT".to_string())
        }
    }

    struct FixedTranscripts(Vec<TranscriptEntry>);

    #[async_trait]
    impl TranscriptFetcher for FixedTranscripts {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<TranscriptEntry>> {
            Ok(self.0.clone())
        }
    }

    struct DisabledTranscripts;

    #[async_trait]
    impl TranscriptFetcher for DisabledTranscripts {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<TranscriptEntry>> {
            Err(StudyError::TranscriptsDisabled)
        }
    }

    struct FixedSpeech(&'static str);

    #[async_trait]
    impl SpeechToText for FixedSpeech {
        async fn transcribe(&self, audio_path: &Path) -> Result<String> {
            assert!(audio_path.exists());
            if self.0.is_empty() {
                return Err(StudyError::SpeechRecognition("no speech detected".to_string()));
            }
            Ok(self.0.to_string())
        }
    }

    fn test_settings(temp: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.temp_dir = temp.to_string_lossy().into_owned();
        settings.speech.convert_with_ffmpeg = false;
        settings
    }

    fn service(
        temp: &Path,
        model: Option<Arc<dyn StudyModel>>,
        speech: Option<Arc<dyn SpeechToText>>,
    ) -> StudyService {
        let transcripts = Arc::new(FixedTranscripts(vec![
            TranscriptEntry::new("Plants need light.", 0.0),
            TranscriptEntry::new("[Music]", 1.0),
            TranscriptEntry::new("Roots absorb water.", 6.0),
        ]));
        StudyService::with_components(test_settings(temp), model, transcripts, speech)
            .with_seed(Some(7))
    }

    #[tokio::test]
    async fn test_analyze_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), Some(Arc::new(BrokenModel)), None);
        assert!(service.ai_powered());

        let analysis = service.analyze(&Document::text(LESSON)).await;
        assert_eq!(analysis.sentence_count, 4);
        assert!(analysis.summary.starts_with("Photosynthesis converts"));
    }

    #[tokio::test]
    async fn test_voice_analysis_chain() {
        let dir = tempfile::tempdir().unwrap();
        let document = Document::new(LESSON, SourceKind::Voice);

        let voice = service(dir.path(), Some(Arc::new(CannedModel::default())), None);
        let analysis = voice.analyze(&document).await;
        assert_eq!(analysis.subject.as_deref(), Some("biology"));

        let model = Arc::new(CannedModel {
            voice_fails: true,
            ..CannedModel::default()
        });
        let fallback = service(dir.path(), Some(model.clone()), None);
        assert_eq!(fallback.analyze(&document).await.summary, "hosted summary");
        assert_eq!(model.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_quiz_refines_youtube_text() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(CannedModel::default());
        let service = service(dir.path(), Some(model.clone()), None);

        service
            .quiz("raw words", QuizType::All, 3, SourceKind::Youtube)
            .await
            .unwrap();
        service
            .flashcards("plain words", 3, SourceKind::Text)
            .await
            .unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec!["quiz:REFINED TRANSCRIPT", "flashcards:plain words"]
        );
    }

    #[tokio::test]
    async fn test_local_generation_after_model_failure() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), Some(Arc::new(BrokenModel)), None);

        let quiz = service
            .quiz(LESSON, QuizType::MultipleChoice, 4, SourceKind::Youtube)
            .await
            .unwrap();
        assert!(!quiz.questions.is_empty());

        let deck = service.flashcards(LESSON, 2, SourceKind::Text).await.unwrap();
        assert_eq!(deck.flashcards.len(), 2);
    }

    #[tokio::test]
    async fn test_short_text_is_insufficient_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None, None);

        let result = service.quiz("Too short.", QuizType::All, 5, SourceKind::Text).await;
        assert!(matches!(
            result,
            Err(StudyError::InsufficientContent(ContentKind::Quiz))
        ));
        let result = service.flashcards("Too short.", 5, SourceKind::Text).await;
        assert!(matches!(
            result,
            Err(StudyError::InsufficientContent(ContentKind::Flashcards))
        ));
    }

    #[tokio::test]
    async fn test_seeded_service_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = service(dir.path(), None, None);
        let b = service(dir.path(), None, None);

        let first = a.quiz(LESSON, QuizType::All, 4, SourceKind::Text).await.unwrap();
        let second = b.quiz(LESSON, QuizType::All, 4, SourceKind::Text).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_process_text_keeps_full_text() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None, None);

        let result = service.process_text(LESSON).await;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["full_text"], LESSON);
        assert_eq!(json["sentence_count"], 4);
        assert!(json.get("video_id").is_none());
    }

    #[tokio::test]
    async fn test_process_youtube() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None, None);

        let result = service
            .process_youtube("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(result.source.as_deref(), Some("youtube"));
        assert_eq!(result.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            result.text_preview.as_deref(),
            Some("Plants need light.\n\nRoots absorb water.")
        );
        assert_eq!(result.transcript_size, Some(39));
        assert!(result.full_text.is_none());
        assert_eq!(result.analysis.sentence_count, 2);
    }

    #[tokio::test]
    async fn test_process_youtube_errors() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None, None);
        assert!(matches!(
            service.process_youtube("https://example.com/video").await,
            Err(StudyError::InvalidInput(_))
        ));

        let disabled = StudyService::with_components(
            test_settings(dir.path()),
            None,
            Arc::new(DisabledTranscripts),
            None,
        );
        assert!(matches!(
            disabled.process_youtube("dQw4w9WgXcQ").await,
            Err(StudyError::TranscriptsDisabled)
        ));
    }

    #[tokio::test]
    async fn test_process_voice_preview() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(
            dir.path(),
            None,
            Some(Arc::new(FixedSpeech("Enzymes speed up reactions."))),
        );
        let payload = format!("data:audio/webm;base64,{}", STANDARD.encode(b"fake audio"));

        let outcome = service.process_voice(&payload, true).await.unwrap();
        let VoiceOutcome::Preview(preview) = outcome else {
            panic!("expected a preview");
        };
        assert_eq!(preview.source, "voice_note_preview");
        assert_eq!(preview.full_text, "Enzymes speed up reactions.");
        assert!(!preview.conversion_successful);
        assert!(preview.ffmpeg_missing);

        let outcome = service.process_voice(&payload, false).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["source"], "voice_note");
        assert_eq!(json["sentence_count"], 1);
        assert_eq!(json["ffmpeg_missing"], true);
    }

    #[tokio::test]
    async fn test_process_voice_creates_missing_temp_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("cache").join("voice");
        let service = service(&root, None, Some(Arc::new(FixedSpeech("Cells divide."))));
        let payload = STANDARD.encode(b"fake audio");

        assert!(service.process_voice(&payload, true).await.is_ok());
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_process_pdf_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None, None);
        assert!(service.process_pdf(b"not a pdf".to_vec()).await.is_err());
    }

    #[tokio::test]
    async fn test_process_voice_errors() {
        let dir = tempfile::tempdir().unwrap();
        let payload = STANDARD.encode(b"fake audio");

        let no_speech = service(dir.path(), None, None);
        assert!(matches!(
            no_speech.process_voice(&payload, false).await,
            Err(StudyError::SpeechUnavailable(_))
        ));
        assert!(matches!(
            no_speech.process_voice("@@@", false).await,
            Err(StudyError::InvalidInput(_))
        ));

        let silent = service(dir.path(), None, Some(Arc::new(FixedSpeech(""))));
        assert!(matches!(
            silent.process_voice(&payload, false).await,
            Err(StudyError::SpeechRecognition(_))
        ));
    }
}
