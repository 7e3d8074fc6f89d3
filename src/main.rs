//! Virtuosa CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use virtuosa::cli::{commands, Cli, Commands};
use virtuosa::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| settings.log_filter(cli.verbose)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Some(library) = &cli.library {
        settings.library.music_dir = library.clone();
    }

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Scan { skipped } => {
            commands::run_scan(*skipped, &settings)?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(query, *limit, settings).await?;
        }

        Commands::Generate { description, save } => {
            commands::run_generate(description, *save, settings).await?;
        }

        Commands::Voice { audio, save } => {
            commands::run_voice(audio, *save, settings).await?;
        }

        Commands::Playlists => {
            commands::run_playlists(&settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
