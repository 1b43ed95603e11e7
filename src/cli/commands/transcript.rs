//! Transcript command implementation.

use super::{build_service, prepare_input};
use crate::cli::{Input, Output};
use crate::config::Settings;
use anyhow::{bail, Result};
use tracing::info;

/// Print the normalized transcript of a video.
pub async fn run_transcript(video: &str, settings: Settings) -> Result<()> {
    let Input::Youtube(url) = prepare_input(video)? else {
        bail!("'{}' is not a YouTube URL or video ID", video);
    };
    let service = build_service(settings, true, None)?;

    let spinner = Output::spinner("Fetching transcript...");
    let result = service.transcript(&url).await;
    spinner.finish_and_clear();

    match result {
        Ok((video_id, transcript)) => {
            info!("Transcript for {}: {} characters", video_id, transcript.chars().count());
            println!("{}", transcript);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to fetch transcript: {}", e));
            Err(e.into())
        }
    }
}
