//! Study Companion CLI entry point.

use anyhow::Result;
use clap::Parser;
use study_companion::cli::{commands, Cli, Commands};
use study_companion::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(|p| Settings::expand_path(p))
        .unwrap_or_else(Settings::default_config_path);
    let settings = Settings::load_from(Some(config_path.as_path()))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("study_companion={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Analyze { input, local, json } => {
            commands::run_analyze(&input, local, json, settings).await?;
        }

        Commands::Quiz {
            input,
            quiz_type,
            count,
            local,
            seed,
            json,
        } => {
            commands::run_quiz(&input, quiz_type, count, local, seed, json, settings).await?;
        }

        Commands::Flashcards {
            input,
            count,
            local,
            seed,
            json,
        } => {
            commands::run_flashcards(&input, count, local, seed, json, settings).await?;
        }

        Commands::Transcript { video } => {
            commands::run_transcript(&video, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, &config_path)?;
        }
    }

    Ok(())
}
