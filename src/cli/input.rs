//! Resolution of command-line inputs into documents.

use crate::error::{Result, StudyError};
use crate::extract::{extract_pdf_text, is_pdf_filename};
use crate::service::StudyService;
use crate::study::SourceKind;
use crate::transcript::parse_video_id;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// What an input argument refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Pdf(String),
    TextFile(String),
    Youtube(String),
}

impl Input {
    pub fn source(&self) -> SourceKind {
        match self {
            Input::Stdin | Input::TextFile(_) => SourceKind::Text,
            Input::Pdf(_) => SourceKind::Pdf,
            Input::Youtube(_) => SourceKind::Youtube,
        }
    }

    /// Read the input's text, fetching the transcript for videos.
    pub async fn read_text(&self, service: &StudyService) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                Ok(text)
            }
            Input::Pdf(path) => extract_pdf_text(tokio::fs::read(path).await?).await,
            Input::TextFile(path) => Ok(tokio::fs::read_to_string(path).await?),
            Input::Youtube(url) => {
                let (video_id, transcript) = service.transcript(url).await?;
                debug!("Fetched transcript for {}", video_id);
                Ok(transcript)
            }
        }
    }
}

/// Classify an input: `-` is stdin, existing files are PDFs or text, and
/// anything else must be a YouTube URL or video ID.
pub fn resolve_input(input: &str) -> Result<Input> {
    if input == "-" {
        return Ok(Input::Stdin);
    }

    if Path::new(input).is_file() {
        return Ok(if is_pdf_filename(input) {
            Input::Pdf(input.to_string())
        } else {
            Input::TextFile(input.to_string())
        });
    }

    if parse_video_id(input).is_some() {
        return Ok(Input::Youtube(input.to_string()));
    }

    Err(StudyError::InvalidInput(format!(
        "'{}' is not a file, '-' or a YouTube URL",
        input
    )))
}
