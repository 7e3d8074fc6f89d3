//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    let config_path = Settings::default_config_path();

    match action {
        ConfigAction::Show => {
            let toml_str =
                toml::to_string_pretty(&settings).context("Failed to serialize config")?;
            println!("{}", toml_str);
            print_effective(&settings);
        }

        ConfigAction::Edit => edit(&config_path, &settings)?,

        ConfigAction::Path => println!("{}", config_path.display()),
    }

    Ok(())
}

/// Open the config in `$EDITOR` and report what the pipeline will use afterwards.
fn edit(config_path: &Path, settings: &Settings) -> Result<()> {
    if !config_path.exists() {
        settings.save_to(config_path)?;
        Output::info(&format!("Wrote default config to {}", config_path.display()));
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    let status = std::process::Command::new(&editor)
        .arg(config_path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}'", editor))?;

    if !status.success() {
        Output::warning(&format!("{} exited with {}; config left as is.", editor, status));
        return Ok(());
    }

    // Re-read so a typo shows up now rather than at the next scan
    match Settings::load_from(Some(&config_path.to_path_buf())) {
        Ok(updated) => {
            Output::success("Config updated.");
            print_effective(&updated);
        }
        Err(e) => Output::error(&format!("Config no longer parses: {}", e)),
    }

    Ok(())
}

fn print_effective(settings: &Settings) {
    println!();
    Output::header("Effective settings");
    for (key, value) in effective(settings) {
        Output::kv(key, &value);
    }
}

/// Resolved values the commands actually use.
fn effective(settings: &Settings) -> Vec<(&'static str, String)> {
    vec![
        ("Music library", settings.music_dir().display().to_string()),
        ("Backend", settings.backend.base_url.clone()),
        ("Embedding model", settings.embedding.model.clone()),
        ("Generation model", settings.generation.model.clone()),
        (
            "Transcription",
            settings
                .transcription
                .base_url
                .clone()
                .unwrap_or_else(|| settings.backend.base_url.clone()),
        ),
        ("Playlists", settings.playlists_path().display().to_string()),
    ]
}
