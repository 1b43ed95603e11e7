//! Quiz command implementation.

use super::{build_service, prepare_input, print_json};
use crate::cli::Output;
use crate::config::Settings;
use crate::study::QuizType;
use anyhow::Result;

/// Run the quiz command.
pub async fn run_quiz(
    input: &str,
    quiz_type: QuizType,
    count: Option<usize>,
    local: bool,
    seed: Option<u64>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let input = prepare_input(input)?;
    let count = count.unwrap_or(settings.generation.default_questions);
    let service = build_service(settings, local, seed)?;

    let spinner = Output::spinner("Generating quiz...");
    let quiz = match input.read_text(&service).await {
        Ok(text) => service.quiz(&text, quiz_type, count, input.source()).await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    let quiz = match quiz {
        Ok(quiz) => quiz,
        Err(e) => {
            Output::error(&format!("Failed to generate quiz: {}", e));
            return Err(e.into());
        }
    };

    if json {
        return print_json(&quiz);
    }

    if quiz.questions.is_empty() {
        Output::warning("No questions could be generated from this text.");
        return Ok(());
    }

    Output::header(&format!("Quiz ({} questions)", quiz.questions.len()));
    for (i, question) in quiz.questions.iter().enumerate() {
        Output::question(i + 1, question);
    }
    Ok(())
}
