//! Doctor command - verify external tools and configuration.

use crate::audio::install_hint;
use crate::cli::Output;
use crate::config::Settings;
use crate::openai::API_KEY_VAR;
use console::style;
use std::path::Path;
use std::process::Command;

/// Outcome of one diagnostic.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn new(status: CheckStatus, name: &str, message: impl Into<String>, hint: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            hint: hint.map(str::to_string),
        }
    }

    fn ok(name: &str, message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Ok, name, message, None)
    }

    fn warning(name: &str, message: impl Into<String>, hint: &str) -> Self {
        Self::new(CheckStatus::Warning, name, message, Some(hint))
    }

    fn error(name: &str, message: impl Into<String>, hint: &str) -> Self {
        Self::new(CheckStatus::Error, name, message, Some(hint))
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };
        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Print a titled group of checks and collect them.
fn section(title: &str, group: Vec<CheckResult>, all: &mut Vec<CheckResult>) {
    println!("{}", style(title).bold());
    for check in &group {
        check.print();
    }
    println!();
    all.extend(group);
}

/// Run all diagnostic checks.
///
/// Missing tools or a missing API key only disable features and are reported
/// as warnings. An unusable temp directory is the only error.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Study Companion Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();
    section(
        "External Tools",
        vec![
            check_tool("yt-dlp", "--version", install_hint_ytdlp()),
            check_tool("ffmpeg", "-version", install_hint()),
        ],
        &mut checks,
    );
    section(
        "Hosted Model",
        vec![check_api_key(std::env::var(API_KEY_VAR).ok().as_deref(), settings)],
        &mut checks,
    );
    section("Directories", vec![check_temp_dir(&settings.temp_dir())], &mut checks);
    section("Configuration", vec![check_config_file(config_path)], &mut checks);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found.", errors));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Study Companion is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available. A missing tool only disables a feature.
fn check_tool(name: &str, version_arg: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .chars()
                .take(50)
                .collect::<String>();
            CheckResult::ok(name, version)
        }
        Ok(_) => CheckResult::warning(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::warning(name, "not found", hint)
        }
        Err(e) => CheckResult::warning(name, format!("error: {}", e), hint),
    }
}

fn check_api_key(key: Option<&str>, settings: &Settings) -> CheckResult {
    let hint = format!("Set with: export {}='sk-...' (or add it to .env)", API_KEY_VAR);
    match key.map(str::trim) {
        _ if !settings.model.enabled => CheckResult::ok(
            API_KEY_VAR,
            "hosted model disabled in settings, using local engine",
        ),
        Some(key) if key.starts_with("sk-") && key.chars().count() > 20 => {
            let chars: Vec<char> = key.chars().collect();
            let masked = format!(
                "{}...{}",
                chars[..7].iter().collect::<String>(),
                chars[chars.len() - 4..].iter().collect::<String>()
            );
            CheckResult::ok(
                API_KEY_VAR,
                format!("configured ({}), model {}", masked, settings.model.model),
            )
        }
        Some(key) if !key.is_empty() => CheckResult::warning(
            API_KEY_VAR,
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        _ => CheckResult::warning(API_KEY_VAR, "not set, using local engine", &hint),
    }
}

fn check_temp_dir(dir: &Path) -> CheckResult {
    match std::fs::create_dir_all(dir) {
        Ok(()) => CheckResult::ok("Temp directory", dir.display().to_string()),
        Err(e) => CheckResult::error(
            "Temp directory",
            format!("{} ({})", dir.display(), e),
            "Set general.temp_dir to a writable directory",
        ),
    }
}

fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: study-companion config edit",
        )
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_constructors() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());

        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_api_key_checks() {
        let settings = Settings::default();
        let key = "sk-abcdefghijklmnopqrstuvwxyz";
        let result = check_api_key(Some(key), &settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("sk-abcd...wxyz"));

        assert_eq!(check_api_key(None, &settings).status, CheckStatus::Warning);
        assert_eq!(check_api_key(Some("  "), &settings).status, CheckStatus::Warning);

        let mut disabled = Settings::default();
        disabled.model.enabled = false;
        assert_eq!(check_api_key(None, &disabled).status, CheckStatus::Ok);
    }

    #[test]
    fn test_missing_tool_is_warning() {
        let result = check_tool("study-companion-no-such-tool", "--version", "install it");
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_temp_dir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("tmp");
        assert_eq!(check_temp_dir(&dir).status, CheckStatus::Ok);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_missing_config_file_is_warning() {
        let root = tempfile::tempdir().unwrap();
        let result = check_config_file(&root.path().join("config.toml"));
        assert_eq!(result.status, CheckStatus::Warning);
    }
}
