//! JSON file persistence for generated playlists.

use super::Playlist;
use crate::error::{Result, VirtuosaError};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Appends playlists to a JSON array on disk.
pub struct PlaylistStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PlaylistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored playlists, oldest first. A missing file means none.
    pub async fn list(&self) -> Result<Vec<Playlist>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one playlist by id.
    pub async fn get(&self, id: Uuid) -> Result<Playlist> {
        self.list()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| VirtuosaError::NotFound(format!("playlist {}", id)))
    }

    /// Append a playlist and rewrite the file atomically.
    #[instrument(skip(self, playlist), fields(name = %playlist.name))]
    pub async fn append(&self, playlist: &Playlist) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut playlists = self.list().await?;
        playlists.push(playlist.clone());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&playlists)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Saved playlist ({} total)", playlists.len());
        Ok(())
    }
}
