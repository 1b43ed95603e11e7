//! YouTube caption retrieval.
//!
//! Track discovery goes through `yt-dlp --dump-json`; the chosen caption
//! track is then downloaded in YouTube's `json3` timed-text format.

use super::TranscriptEntry;
use crate::error::{Result, StudyError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, instrument};
use url::Url;

static VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("Invalid regex"));

/// Extract the 11-character video ID from a YouTube URL or a bare ID.
///
/// Accepts `watch?v=`, `youtu.be/`, `embed/`, `shorts/`, `v/` and `live/`
/// forms, with or without a scheme.
pub fn parse_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{}", input)))
        .ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" | "music.youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed" | "shorts" | "v" | "live") => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }?;

    VIDEO_ID.is_match(&candidate).then_some(candidate)
}

/// Source of timestamped transcripts for a video.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>>;
}

/// Fetches captions using `yt-dlp` for discovery and HTTP for the track.
pub struct YtDlpTranscripts {
    languages: Vec<String>,
    client: reqwest::Client,
}

impl YtDlpTranscripts {
    /// `languages` are tried in order; manual subtitles win over
    /// automatic captions within the same language.
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            client: reqwest::Client::new(),
        }
    }

    async fn dump_info(&self, video_id: &str) -> Result<serde_json::Value> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        let output = Command::new("yt-dlp")
            .args(["--dump-json", "--skip-download", "--no-warnings", "--no-playlist", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    StudyError::ToolNotFound("yt-dlp".to_string())
                } else {
                    StudyError::ToolFailed(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StudyError::ToolFailed(format!(
                "yt-dlp could not read video {}: {}",
                video_id,
                stderr.trim()
            )));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[async_trait]
impl TranscriptFetcher for YtDlpTranscripts {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        let info = self.dump_info(video_id).await?;
        let track_url = select_track(&info, &self.languages)?;
        debug!("Downloading caption track for {}", video_id);

        let body = self
            .client
            .get(&track_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries = parse_json3(&body)?;
        info!("Fetched {} caption fragments", entries.len());
        Ok(entries)
    }
}

/// Pick the `json3` URL of the best caption track in `info`.
fn select_track(info: &serde_json::Value, languages: &[String]) -> Result<String> {
    let manual = info["subtitles"].as_object();
    let automatic = info["automatic_captions"].as_object();

    let no_tracks = manual.map_or(true, |m| m.is_empty()) && automatic.map_or(true, |m| m.is_empty());
    if no_tracks {
        return Err(StudyError::TranscriptsDisabled);
    }

    for lang in languages {
        for tracks in [manual, automatic].into_iter().flatten() {
            let matching = tracks
                .iter()
                .filter(|(code, _)| *code == lang || code.starts_with(&format!("{}-", lang)));

            for (_, formats) in matching {
                let json3 = formats
                    .as_array()
                    .into_iter()
                    .flatten()
                    .find(|f| f["ext"] == "json3")
                    .and_then(|f| f["url"].as_str());
                if let Some(url) = json3 {
                    return Ok(url.to_string());
                }
            }
        }
    }

    Err(StudyError::TranscriptNotFound)
}

#[derive(Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    segs: Option<Vec<TimedTextSegment>>,
}

#[derive(Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

/// Parse a `json3` timed-text document into entries, skipping events
/// that carry no text.
fn parse_json3(body: &str) -> Result<Vec<TranscriptEntry>> {
    let timed: TimedText = serde_json::from_str(body)?;

    Ok(timed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            let text = text.trim();
            (!text.is_empty()).then(|| TranscriptEntry::new(text, event.t_start_ms as f64 / 1000.0))
        })
        .collect())
}
