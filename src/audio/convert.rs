//! Audio payload handling using base64 and ffmpeg.

use crate::error::{Result, StudyError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Decode a base64 audio payload, with or without a `data:...;base64,` prefix.
pub fn decode_audio_payload(payload: &str) -> Result<Vec<u8>> {
    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| StudyError::InvalidInput("Invalid audio data format".to_string()))?;

    if bytes.is_empty() {
        return Err(StudyError::InvalidInput("Invalid audio data format".to_string()));
    }
    Ok(bytes)
}

/// Whether `ffmpeg` can be started from the PATH.
pub async fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Convert any audio file ffmpeg understands to 16 kHz mono WAV next to it.
#[instrument(skip_all, fields(source = %source.display()))]
pub async fn convert_to_wav(source: &Path) -> Result<PathBuf> {
    let dest = source.with_extension("wav");
    debug!("Converting to WAV");

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-ac").arg("1")
        .arg("-ar").arg("16000")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() && dest.exists() => Ok(dest),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(StudyError::ToolFailed(format!("ffmpeg conversion failed: {}", err.trim())))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StudyError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(StudyError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}

/// How to install ffmpeg on the current platform.
pub fn install_hint() -> &'static str {
    match std::env::consts::OS {
        "macos" => "Run 'brew install ffmpeg' in Terminal to install.",
        "linux" => "Run 'sudo apt-get install ffmpeg' on Ubuntu/Debian or 'sudo yum install ffmpeg' on CentOS/RHEL.",
        "windows" => "Download it from https://ffmpeg.org/download.html or run 'choco install ffmpeg'.",
        _ => "See https://ffmpeg.org/download.html.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_data_url() {
        let encoded = STANDARD.encode(b"RIFF....WAVE");
        assert_eq!(decode_audio_payload(&encoded).unwrap(), b"RIFF....WAVE");

        let data_url = format!("data:audio/webm;codecs=opus;base64,{}", encoded);
        assert_eq!(decode_audio_payload(&data_url).unwrap(), b"RIFF....WAVE");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_audio_payload("%%% not base64 %%%"),
            Err(StudyError::InvalidInput(_))
        ));
        assert!(matches!(decode_audio_payload(""), Err(StudyError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_convert_missing_file_fails() {
        if !ffmpeg_available().await {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let result = convert_to_wav(&dir.path().join("missing.webm")).await;
        assert!(matches!(result, Err(StudyError::ToolFailed(_))));
    }
}
