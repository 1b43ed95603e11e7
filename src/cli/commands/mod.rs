//! CLI command implementations.

mod analyze;
mod config;
mod doctor;
mod flashcards;
mod quiz;
mod serve;
mod transcript;

pub use analyze::run_analyze;
pub use config::run_config;
pub use doctor::run_doctor;
pub use flashcards::run_flashcards;
pub use quiz::run_quiz;
pub use serve::run_serve;
pub use transcript::run_transcript;

use crate::cli::{preflight, resolve_input, Input, Output};
use crate::config::Settings;
use crate::service::StudyService;
use serde::Serialize;

/// Build the service for a one-shot command. `local` disables the hosted model.
fn build_service(mut settings: Settings, local: bool, seed: Option<u64>) -> anyhow::Result<StudyService> {
    if local {
        settings.model.enabled = false;
    }
    Ok(StudyService::new(settings)?.with_seed(seed))
}

/// Resolve an input argument and check the tools it needs.
fn prepare_input(input: &str) -> anyhow::Result<Input> {
    let input = resolve_input(input)?;
    if let Err(e) = preflight::check(&input) {
        Output::error(&e.to_string());
        Output::info("Run 'study-companion doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(input)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
