//! CLI command implementations.

mod config;
mod generate;
mod playlists;
mod scan;
mod search;
mod serve;

pub use config::run_config;
pub use generate::{run_generate, run_voice};
pub use playlists::run_playlists;
pub use scan::run_scan;
pub use search::run_search;
pub use serve::run_serve;

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;

/// Scan the library and build the index, with a spinner while it runs.
pub(crate) async fn start_orchestrator(settings: Settings) -> anyhow::Result<Orchestrator> {
    let spinner = Output::spinner("Scanning library and building index...");
    let result = Orchestrator::start(settings).await;
    spinner.finish_and_clear();

    match result {
        Ok(orchestrator) => {
            let catalog = orchestrator.catalog();
            Output::success(&format!("Indexed {} tracks", catalog.len()));
            if !catalog.skipped().is_empty() {
                Output::warning(&format!(
                    "Skipped {} unreadable files (run 'virtuosa scan --skipped' for details)",
                    catalog.skipped().len()
                ));
            }
            Ok(orchestrator)
        }
        Err(e) => {
            Output::error(&format!("Startup failed: {}", e));
            Err(e.into())
        }
    }
}
