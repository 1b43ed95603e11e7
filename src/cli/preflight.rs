//! Pre-flight checks before operations that need external tools.
//!
//! Fails early with an actionable message instead of midway through a request.

use crate::cli::Input;
use crate::error::{Result, StudyError};
use std::process::Command;

/// Check what the given input needs before it is read.
pub fn check(input: &Input) -> Result<()> {
    if let Input::Youtube(_) = input {
        check_tool("yt-dlp")?;
    }
    Ok(())
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(StudyError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StudyError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(StudyError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_inputs_need_nothing() {
        assert!(check(&Input::Stdin).is_ok());
        assert!(check(&Input::TextFile("notes.txt".to_string())).is_ok());
        assert!(check(&Input::Pdf("paper.pdf".to_string())).is_ok());
    }

    #[test]
    fn test_missing_tool() {
        let err = check_tool("study-companion-no-such-tool").unwrap_err();
        assert!(matches!(err, StudyError::ToolNotFound(_)));
    }
}
