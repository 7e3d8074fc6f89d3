//! Search command implementation.

use super::start_orchestrator;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    let orchestrator = start_orchestrator(settings).await?;

    let spinner = Output::spinner("Searching...");
    let results = orchestrator.search(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("The library is empty.");
            } else {
                Output::success(&format!("Found {} results", results.len()));

                for result in &results {
                    let track = &result.document.metadata;
                    Output::search_result(
                        &track.title,
                        &track.artist,
                        &track.genre,
                        result.score,
                        &track.filepath,
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
