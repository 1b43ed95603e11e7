//! Analyze command implementation.

use super::{build_service, prepare_input, print_json};
use crate::cli::{Input, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the analyze command.
pub async fn run_analyze(input: &str, local: bool, json: bool, settings: Settings) -> Result<()> {
    let input = prepare_input(input)?;
    let service = build_service(settings, local, None)?;

    let spinner = Output::spinner("Analyzing...");
    let result = match &input {
        Input::Youtube(url) => service.process_youtube(url).await,
        Input::Pdf(path) => match tokio::fs::read(path).await {
            Ok(bytes) => service.process_pdf(bytes).await,
            Err(e) => Err(e.into()),
        },
        Input::Stdin | Input::TextFile(_) => match input.read_text(&service).await {
            Ok(text) => Ok(service.process_text(&text).await),
            Err(e) => Err(e),
        },
    };
    spinner.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            Output::error(&format!("Failed to analyze: {}", e));
            return Err(e.into());
        }
    };

    if json {
        return print_json(&result);
    }

    Output::analysis(&result.analysis);
    if let Some(video_id) = &result.video_id {
        println!();
        Output::kv("Video", video_id);
        if let Some(size) = result.transcript_size {
            Output::kv("Transcript", &format!("{} characters", size));
        }
    }
    Ok(())
}
