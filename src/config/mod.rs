//! Configuration module for Study Companion.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{
    AnalysisPrompts, FlashcardPrompts, Prompts, QuizPrompts, RefinePrompts, VoicePrompts,
};
pub use settings::{
    GeneralSettings, GenerationSettings, ModelSettings, PromptSettings, ServerSettings, Settings,
    SpeechSettings, YoutubeSettings,
};
