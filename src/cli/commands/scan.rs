//! Scan command implementation.

use crate::cli::output::format_duration;
use crate::cli::Output;
use crate::config::Settings;
use crate::library;
use anyhow::Result;
use std::collections::BTreeMap;

/// Run the scan command.
pub fn run_scan(show_skipped: bool, settings: &Settings) -> Result<()> {
    let music_dir = settings.music_dir();
    let spinner = Output::spinner(&format!("Scanning {}...", music_dir.display()));
    let result = library::scan(&music_dir, &settings.library);
    spinner.finish_and_clear();

    let catalog = match result {
        Ok(catalog) => catalog,
        Err(e) => {
            Output::error(&format!("Scan failed: {}", e));
            return Err(e.into());
        }
    };

    if catalog.is_empty() {
        Output::warning("No readable audio files found.");
    } else {
        Output::header(&format!("Library ({} tracks)", catalog.len()));
        println!();

        let mut genres: BTreeMap<&str, usize> = BTreeMap::new();
        for track in catalog.tracks() {
            *genres.entry(track.genre.as_str()).or_default() += 1;
        }
        for (genre, count) in &genres {
            Output::list_item(&format!("{} ({})", genre, count));
        }

        let total: u64 = catalog.tracks().iter().map(|t| t.duration).sum();
        println!();
        Output::kv("Total tracks", &catalog.len().to_string());
        Output::kv("Total duration", &format_duration(total));
    }

    if !catalog.skipped().is_empty() {
        Output::kv("Skipped files", &catalog.skipped().len().to_string());
        if show_skipped {
            for skipped in catalog.skipped() {
                Output::list_item(&format!("{}: {}", skipped.path.display(), skipped.reason));
            }
        }
    }

    Ok(())
}
