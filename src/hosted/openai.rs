//! Study generation through OpenAI chat completions.

use super::{truncate_input, StudyModel};
use crate::config::{ModelSettings, Prompts};
use crate::error::{Result, StudyError};
use crate::openai::create_client;
use crate::study::{Analysis, FlashcardDeck, Quiz, QuizType};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_openai::Client;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Hosted model backed by the OpenAI chat API.
pub struct OpenAIStudyModel {
    client: Client<OpenAIConfig>,
    model: String,
    prompts: Prompts,
    max_input_chars: usize,
}

impl OpenAIStudyModel {
    pub fn new(settings: &ModelSettings, prompts: Prompts, api_key: &str) -> Result<Self> {
        let client = create_client(api_key, Duration::from_secs(settings.timeout_seconds))?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            prompts,
            max_input_chars: settings.max_input_chars,
        })
    }

    /// Template variables shared by every prompt: the (truncated) input text.
    fn vars(&self, text: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert(
            "text".to_string(),
            truncate_input(text, self.max_input_chars).into_owned(),
        );
        vars
    }

    async fn complete(&self, system: &str, user: String, json: bool) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| StudyError::Model(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| StudyError::Model(e.to_string()))?
                .into(),
        ];

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(messages);
        if json {
            request.response_format(ResponseFormat::JsonObject);
        }
        let request = request
            .build()
            .map_err(|e| StudyError::Model(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            StudyError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| StudyError::Model("Empty response from model".to_string()))?
            .clone();

        debug!("Received {} characters from {}", content.len(), self.model);
        Ok(content)
    }

    async fn complete_json<T: DeserializeOwned>(&self, system: &str, user: String) -> Result<T> {
        let content = self.complete(system, user, true).await?;
        parse_response(&content)
    }
}

/// Parse a JSON model reply into `T`.
fn parse_response<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content)
        .map_err(|e| StudyError::Model(format!("Unexpected response shape: {}", e)))
}

#[async_trait]
impl StudyModel for OpenAIStudyModel {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all)]
    async fn analyze(&self, text: &str) -> Result<Analysis> {
        let user = self
            .prompts
            .render_with_custom(&self.prompts.analysis.user, &self.vars(text));
        self.complete_json(&self.prompts.analysis.system, user).await
    }

    #[instrument(skip_all)]
    async fn analyze_voice(&self, text: &str) -> Result<Analysis> {
        let user = self
            .prompts
            .render_with_custom(&self.prompts.voice.user, &self.vars(text));
        self.complete_json(&self.prompts.voice.system, user).await
    }

    #[instrument(skip(self, text))]
    async fn quiz(&self, text: &str, quiz_type: QuizType, count: usize) -> Result<Quiz> {
        let mut vars = self.vars(text);
        vars.insert("num_questions".to_string(), count.to_string());
        vars.insert("quiz_type".to_string(), quiz_type.to_string());

        let user = self.prompts.render_with_custom(&self.prompts.quiz.user, &vars);
        self.complete_json(&self.prompts.quiz.system, user).await
    }

    #[instrument(skip(self, text))]
    async fn flashcards(&self, text: &str, count: usize) -> Result<FlashcardDeck> {
        let mut vars = self.vars(text);
        vars.insert("num_cards".to_string(), count.to_string());

        let user = self
            .prompts
            .render_with_custom(&self.prompts.flashcards.user, &vars);
        self.complete_json(&self.prompts.flashcards.system, user).await
    }

    #[instrument(skip_all)]
    async fn refine_transcript(&self, text: &str) -> Result<String> {
        let user = self
            .prompts
            .render_with_custom(&self.prompts.refine.user, &self.vars(text));
        self.complete(&self.prompts.refine.system, user, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::QuizQuestion;

    #[test]
    fn test_parse_voice_analysis() {
        let analysis: Analysis = parse_response(
            r#"{"summary": "A note about enzymes.", "key_points": ["Enzymes speed reactions"],
                "key_concepts": ["enzyme"], "word_count": 42, "subject": "Biochemistry"}"#,
        )
        .unwrap();
        assert_eq!(analysis.subject.as_deref(), Some("Biochemistry"));
        assert_eq!(analysis.word_count, 42);
        assert_eq!(analysis.sentence_count, 0);
    }

    #[test]
    fn test_parse_quiz() {
        let quiz: Quiz = parse_response(
            r#"{"questions": [{"type": "true-false", "question": "Water boils at 100C at sea level.",
                "answer": true, "explanation": "Standard pressure."}]}"#,
        )
        .unwrap();
        assert!(matches!(
            quiz.questions[0],
            QuizQuestion::TrueFalse { answer: true, .. }
        ));
    }

    #[test]
    fn test_malformed_response_is_model_error() {
        let result: Result<FlashcardDeck> = parse_response("Here are your flashcards!");
        assert!(matches!(result, Err(StudyError::Model(_))));

        let result: Result<FlashcardDeck> = parse_response(r#"{"cards": []}"#);
        assert!(matches!(result, Err(StudyError::Model(_))));
    }

    #[test]
    fn test_prompt_variables_are_truncated() {
        let settings = ModelSettings {
            max_input_chars: 4,
            ..ModelSettings::default()
        };
        let model = OpenAIStudyModel::new(&settings, Prompts::default(), "sk-test").unwrap();
        assert_eq!(model.vars("abcdefgh")["text"], "abcd...");
        assert_eq!(model.name(), "gpt-3.5-turbo-0125");
    }
}
