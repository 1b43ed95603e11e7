//! Prompt templates for the hosted model.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub analysis: AnalysisPrompts,
    pub quiz: QuizPrompts,
    pub flashcards: FlashcardPrompts,
    /// Condensing raw video transcripts before generation.
    pub refine: RefinePrompts,
    /// Analysis of transcribed voice notes.
    pub voice: VoicePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for document analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPrompts {
    pub system: String,
    pub user: String,
}

impl Default for AnalysisPrompts {
    fn default() -> Self {
        Self {
            system: "You are an academic analyst. You write accurate, concise summaries and extract only the information that matters, leaving out tangents and filler.".to_string(),

            user: r#"Analyze the study material below.

Provide:
1. A summary of 3-5 sentences covering the main thesis and core arguments
2. Exactly 5 key points, each a precise factual statement
3. The 10 most significant key concepts or domain terms
4. The word count and sentence count of the material

Only use what the material says.

Respond with a JSON object of this shape:
{
  "summary": "string",
  "key_points": ["string"],
  "key_concepts": ["string"],
  "word_count": 0,
  "sentence_count": 0
}

Material:
{{text}}"#
                .to_string(),
        }
    }
}

/// Prompts for quiz generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizPrompts {
    pub system: String,
    pub user: String,
}

impl Default for QuizPrompts {
    fn default() -> Self {
        Self {
            system: "You are an experienced educator. You write demanding assessments that test understanding of the most important ideas and ignore trivia.".to_string(),

            user: r#"Write a quiz of exactly {{num_questions}} questions about the study material below.

Question type: {{quiz_type}} (multiple-choice, true-false, open-ended, or all for a mix)

Rules:
- Test understanding of core concepts, not recall of incidental details
- Multiple-choice questions have exactly 4 plausible options and one correct answer; no "all/none of the above"
- True/false statements are complete sentences that require careful reading
- Open-ended questions come with framing context, a model answer and its key points

Respond with a JSON object of this shape:
{
  "questions": [
    {"type": "multiple-choice", "question": "string", "options": ["a", "b", "c", "d"],
     "answer": "exact text of the correct option", "explanation": "string"},
    {"type": "true-false", "question": "statement", "answer": true, "explanation": "string"},
    {"type": "open-ended", "question": "string", "context": "string",
     "suggested_answer": "string", "key_points": ["string"]}
  ]
}

Material:
{{text}}"#
                .to_string(),
        }
    }
}

/// Prompts for flashcard generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashcardPrompts {
    pub system: String,
    pub user: String,
}

impl Default for FlashcardPrompts {
    fn default() -> Self {
        Self {
            system: "You create flashcards for spaced-repetition study. Every card covers one important concept; cards about trivial details are left out.".to_string(),

            user: r#"Create exactly {{num_cards}} flashcards from the study material below.

Each card:
- front: a direct question or prompt about a single concept, asking for recall
- back: a complete explanation in at most 3 sentences, using the material's terminology
- key_term: the central term
- context: where the concept appears in the material
- example: a concrete application, if the material gives one
- related_concepts: other terms from the material connected to this one

Respond with a JSON object of this shape:
{
  "flashcards": [
    {"front": "string", "back": "string", "key_term": "string", "context": "string",
     "example": "string", "related_concepts": ["string"]}
  ]
}

Material:
{{text}}"#
                .to_string(),
        }
    }
}

/// Prompts for transcript refinement. The response is plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinePrompts {
    pub system: String,
    pub user: String,
}

impl Default for RefinePrompts {
    fn default() -> Self {
        Self {
            system: "You edit raw video transcripts into clear, coherent prose that keeps only the educational content.".to_string(),

            user: r#"Rewrite the raw transcript below as well-structured text.

- Remove filler words, repetitions, speech artifacts and off-topic remarks
- Keep the core concepts, explanations and essential points
- Organize what remains so it reads as continuous prose
- Do not add information that is not in the transcript

Raw transcript:
{{text}}"#
                .to_string(),
        }
    }
}

/// Prompts for voice-note analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoicePrompts {
    pub system: String,
    pub user: String,
}

impl Default for VoicePrompts {
    fn default() -> Self {
        Self {
            system: "You analyze transcribed voice notes. Everything you report must have been said in the recording; you never add or extrapolate.".to_string(),

            user: r#"Analyze the voice-note transcription below, reporting only what was actually said.

Provide:
1. A summary of 3-4 sentences
2. 3-5 key points stated explicitly in the recording
3. 5-8 key concepts or terms that were mentioned
4. The word count and a short description of the subject

Ignore filler words and speech artifacts.

Respond with a JSON object of this shape:
{
  "summary": "string",
  "key_points": ["string"],
  "key_concepts": ["string"],
  "word_count": 0,
  "subject": "string"
}

Transcription:
{{text}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            if let Some(content) = read_override(&custom_path, "analysis.toml")? {
                prompts.analysis = toml::from_str(&content)?;
            }
            if let Some(content) = read_override(&custom_path, "quiz.toml")? {
                prompts.quiz = toml::from_str(&content)?;
            }
            if let Some(content) = read_override(&custom_path, "flashcards.toml")? {
                prompts.flashcards = toml::from_str(&content)?;
            }
            if let Some(content) = read_override(&custom_path, "refine.toml")? {
                prompts.refine = toml::from_str(&content)?;
            }
            if let Some(content) = read_override(&custom_path, "voice.toml")? {
                prompts.voice = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

fn read_override(dir: &std::path::Path, file: &str) -> crate::error::Result<Option<String>> {
    let path = dir.join(file);
    if path.exists() {
        Ok(Some(std::fs::read_to_string(&path)?))
    } else {
        Ok(None)
    }
}
