//! Playlists command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::playlist::PlaylistStore;
use anyhow::Result;

/// Run the playlists command. Reads the store directly; no backend needed.
pub async fn run_playlists(settings: &Settings) -> Result<()> {
    let store = PlaylistStore::new(settings.playlists_path());

    match store.list().await {
        Ok(playlists) => {
            if playlists.is_empty() {
                Output::info("No playlists saved yet. Use 'virtuosa generate <description> --save'.");
            } else {
                Output::header(&format!("Saved Playlists ({})", playlists.len()));
                for playlist in &playlists {
                    Output::playlist(playlist);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to read playlists: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
