//! Generate and voice command implementations.

use super::start_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result as VirtuosaResult;
use crate::orchestrator::Orchestrator;
use crate::rag::Generation;
use anyhow::Result;
use std::path::Path;

/// Run the generate command.
pub async fn run_generate(description: &str, save: bool, settings: Settings) -> Result<()> {
    let orchestrator = start_orchestrator(settings).await?;

    let spinner = Output::spinner("Generating playlist...");
    let result = orchestrator.generate(description).await;
    spinner.finish_and_clear();

    finish(&orchestrator, result, save).await
}

/// Run the voice command.
pub async fn run_voice(audio: &str, save: bool, settings: Settings) -> Result<()> {
    let path = Path::new(audio);
    if !path.is_file() {
        Output::error(&format!("Audio file not found: {}", audio));
        return Err(anyhow::anyhow!("Audio file not found: {}", audio));
    }

    let orchestrator = start_orchestrator(settings).await?;

    let spinner = Output::spinner("Transcribing and generating playlist...");
    let result = orchestrator.generate_from_voice(path).await;
    spinner.finish_and_clear();

    finish(&orchestrator, result, save).await
}

async fn finish(
    orchestrator: &Orchestrator,
    result: VirtuosaResult<Generation>,
    save: bool,
) -> Result<()> {
    let generation = match result {
        Ok(generation) => generation,
        Err(e) => {
            Output::error(&format!("Playlist generation failed: {}", e));
            if e.is_retryable() {
                Output::info("This may succeed if you try again or rephrase the request.");
            }
            return Err(e.into());
        }
    };

    Output::playlist(&generation.playlist);
    println!();
    Output::kv("Candidates considered", &generation.candidates.len().to_string());
    if !generation.dropped.is_empty() {
        Output::warning(&format!(
            "Ignored {} suggested tracks that are not in your library",
            generation.dropped.len()
        ));
    }

    if save {
        orchestrator.save(&generation.playlist).await?;
        Output::success(&format!(
            "Saved to {}",
            orchestrator.store().path().display()
        ));
    }

    Ok(())
}
