//! Flashcards command implementation.

use super::{build_service, prepare_input, print_json};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the flashcards command.
pub async fn run_flashcards(
    input: &str,
    count: Option<usize>,
    local: bool,
    seed: Option<u64>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let input = prepare_input(input)?;
    let count = count.unwrap_or(settings.generation.default_cards);
    let service = build_service(settings, local, seed)?;

    let spinner = Output::spinner("Generating flashcards...");
    let deck = match input.read_text(&service).await {
        Ok(text) => service.flashcards(&text, count, input.source()).await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    let deck = match deck {
        Ok(deck) => deck,
        Err(e) => {
            Output::error(&format!("Failed to generate flashcards: {}", e));
            return Err(e.into());
        }
    };

    if json {
        return print_json(&deck);
    }

    if deck.flashcards.is_empty() {
        Output::warning("No flashcards could be generated from this text.");
        return Ok(());
    }

    Output::header(&format!("Flashcards ({})", deck.flashcards.len()));
    for (i, card) in deck.flashcards.iter().enumerate() {
        Output::flashcard(i + 1, card);
    }
    Ok(())
}
