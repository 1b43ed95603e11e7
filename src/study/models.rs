//! Data models for study material and generated artifacts.
//!
//! Field names of the serialized types are part of the HTTP contract.

use serde::{Deserialize, Serialize};

/// Where a document's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Text,
    Pdf,
    Youtube,
    Voice,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SourceKind::Text),
            "pdf" => Ok(SourceKind::Pdf),
            "youtube" => Ok(SourceKind::Youtube),
            "voice" | "voice_note" => Ok(SourceKind::Voice),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Text => write!(f, "text"),
            SourceKind::Pdf => write!(f, "pdf"),
            SourceKind::Youtube => write!(f, "youtube"),
            SourceKind::Voice => write!(f, "voice"),
        }
    }
}

/// Extracted source text plus provenance. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    source: SourceKind,
}

impl Document {
    pub fn new(text: impl Into<String>, source: SourceKind) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// Shorthand for a plain-text document.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, SourceKind::Text)
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Summary and statistics for a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub sentence_count: usize,
    /// Subject matter, reported by the hosted model for voice notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Which question types a quiz should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizType {
    MultipleChoice,
    TrueFalse,
    OpenEnded,
    #[default]
    All,
}

impl QuizType {
    /// Whether this filter admits questions of type `kind`.
    pub fn includes(self, kind: QuizType) -> bool {
        self == QuizType::All || self == kind
    }
}

impl std::str::FromStr for QuizType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "multiple-choice" | "mcq" => Ok(QuizType::MultipleChoice),
            "true-false" | "tf" => Ok(QuizType::TrueFalse),
            "open-ended" | "open" => Ok(QuizType::OpenEnded),
            "all" | "mixed" => Ok(QuizType::All),
            _ => Err(format!("Unknown quiz type: {}", s)),
        }
    }
}

impl std::fmt::Display for QuizType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizType::MultipleChoice => write!(f, "multiple-choice"),
            QuizType::TrueFalse => write!(f, "true-false"),
            QuizType::OpenEnded => write!(f, "open-ended"),
            QuizType::All => write!(f, "all"),
        }
    }
}

/// A single quiz question, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuizQuestion {
    MultipleChoice {
        question: String,
        options: Vec<String>,
        /// Exact text of the correct option.
        answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    TrueFalse {
        question: String,
        answer: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    OpenEnded {
        question: String,
        #[serde(default)]
        context: String,
        #[serde(default)]
        suggested_answer: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        key_points: Vec<String>,
    },
}

impl QuizQuestion {
    pub fn question(&self) -> &str {
        match self {
            QuizQuestion::MultipleChoice { question, .. }
            | QuizQuestion::TrueFalse { question, .. }
            | QuizQuestion::OpenEnded { question, .. } => question,
        }
    }

    pub fn kind(&self) -> QuizType {
        match self {
            QuizQuestion::MultipleChoice { .. } => QuizType::MultipleChoice,
            QuizQuestion::TrueFalse { .. } => QuizType::TrueFalse,
            QuizQuestion::OpenEnded { .. } => QuizType::OpenEnded,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// A front/back study card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    pub key_term: String,
    /// Another sentence mentioning the term; empty when none exists.
    #[serde(default)]
    pub context: String,
    /// A further usage of the term; empty when none exists.
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    pub flashcards: Vec<Flashcard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_length_counts_characters() {
        let document = Document::new("Größe matters.", SourceKind::Pdf);
        assert_eq!(document.char_len(), 14);
        assert_eq!(document.source(), SourceKind::Pdf);
    }

    #[test]
    fn test_quiz_question_wire_format() {
        let question = QuizQuestion::TrueFalse {
            question: "The sky is blue.".to_string(),
            answer: true,
            explanation: None,
        };
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["type"], "true-false");
        assert_eq!(json["answer"], true);
        assert!(json.get("explanation").is_none());
    }

    #[test]
    fn test_parse_hosted_quiz_payload() {
        let payload = r#"{
            "questions": [
                {"type": "multiple-choice", "question": "Q?", "options": ["a", "b", "c", "d"],
                 "answer": "a", "explanation": "because"},
                {"type": "open-ended", "question": "Why?", "context": "ctx",
                 "suggested_answer": "ans", "key_points": ["p1"]}
            ]
        }"#;
        let quiz: Quiz = serde_json::from_str(payload).unwrap();
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].kind(), QuizType::MultipleChoice);
        assert_eq!(quiz.questions[1].question(), "Why?");
    }

    #[test]
    fn test_quiz_type_parsing() {
        assert_eq!("multiple-choice".parse::<QuizType>(), Ok(QuizType::MultipleChoice));
        assert_eq!("TRUE_FALSE".parse::<QuizType>(), Ok(QuizType::TrueFalse));
        assert_eq!("all".parse::<QuizType>(), Ok(QuizType::All));
        assert!("essay".parse::<QuizType>().is_err());

        assert!(QuizType::All.includes(QuizType::OpenEnded));
        assert!(!QuizType::TrueFalse.includes(QuizType::OpenEnded));
    }

    #[test]
    fn test_analysis_tolerates_missing_counts() {
        let analysis: Analysis =
            serde_json::from_str(r#"{"summary": "s", "key_points": ["k"]}"#).unwrap();
        assert_eq!(analysis.word_count, 0);
        assert!(analysis.subject.is_none());
    }
}
