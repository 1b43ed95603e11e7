//! Timestamped transcripts and their conversion to study text.

mod normalizer;
mod youtube;

pub use normalizer::{clean, normalize, PARAGRAPH_GAP_SECONDS};
pub use youtube::{parse_video_id, TranscriptFetcher, YtDlpTranscripts};

use serde::{Deserialize, Serialize};

/// One caption fragment and the time it starts at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
}

impl TranscriptEntry {
    pub fn new(text: impl Into<String>, start: f64) -> Self {
        Self {
            text: text.into(),
            start,
        }
    }
}
