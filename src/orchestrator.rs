//! Service object for Virtuosa.
//!
//! Built once at startup: scans the library, builds the index, and wires the
//! generator, transcriber and playlist store. Request handlers share it by
//! reference; nothing here is global.

use crate::completion::{Completer, OpenAICompleter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VirtuosaError};
use crate::library::{self, Catalog};
use crate::playlist::{Playlist, PlaylistStore};
use crate::rag::{Generation, PlaylistGenerator};
use crate::transcription::{Transcriber, WhisperTranscriber};
use crate::vector_store::SearchResult;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Virtuosa pipeline.
pub struct Orchestrator {
    settings: Settings,
    catalog: Arc<Catalog>,
    generator: PlaylistGenerator,
    transcriber: Arc<dyn Transcriber>,
    store: PlaylistStore,
}

impl Orchestrator {
    /// Scan the configured library and build the index against the configured backends.
    pub async fn start(settings: Settings) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::from_settings(
            &settings.backend,
            &settings.embedding,
        )?);
        let completer: Arc<dyn Completer> = Arc::new(OpenAICompleter::from_settings(
            &settings.backend,
            &settings.generation,
        )?);
        let transcriber: Arc<dyn Transcriber> = Arc::new(WhisperTranscriber::from_settings(
            &settings.backend,
            &settings.transcription,
        )?);

        let music_dir = settings.music_dir();
        let library_settings = settings.library.clone();
        info!("Scanning music library at {}", music_dir.display());
        let catalog = tokio::task::spawn_blocking(move || library::scan(&music_dir, &library_settings))
            .await
            .map_err(|e| VirtuosaError::Config(format!("library scan task failed: {}", e)))??;

        Self::with_components(settings, catalog, embedder, completer, transcriber).await
    }

    /// Build an orchestrator from an existing catalog and custom components.
    #[instrument(skip_all, fields(tracks = catalog.len()))]
    pub async fn with_components(
        settings: Settings,
        catalog: Catalog,
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let generator = PlaylistGenerator::new(completer, &settings.generation).with_prompts(prompts);
        let indexed = generator.initialize(embedder, &catalog).await?;
        info!("Index ready ({} tracks)", indexed);

        let store = PlaylistStore::new(settings.playlists_path());

        Ok(Self {
            settings,
            catalog: Arc::new(catalog),
            generator,
            transcriber,
            store,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The scanned catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    /// Raw similarity search over the library.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.generator.index()?.query(query, limit).await
    }

    /// Generate a playlist from a text request.
    pub async fn generate(&self, description: &str) -> Result<Generation> {
        self.generator.generate_detailed(description).await
    }

    /// Transcribe a recorded request and generate a playlist from it.
    #[instrument(skip(self), fields(audio = %audio_path.display()))]
    pub async fn generate_from_voice(&self, audio_path: &Path) -> Result<Generation> {
        let description = self.transcriber.transcribe(audio_path).await?;
        info!("Voice request: {}", description);
        self.generate(&description).await
    }

    /// Persist a generated playlist.
    pub async fn save(&self, playlist: &Playlist) -> Result<()> {
        self.store.append(playlist).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_catalog, FixedTranscriber, KeywordEmbedder, ScriptedCompleter};

    async fn orchestrator(answer: &str, spoken: &str, data_dir: &Path) -> Orchestrator {
        let mut settings = Settings::default();
        settings.playlists.path = data_dir.join("playlists.json").to_string_lossy().into_owned();

        Orchestrator::with_components(
            settings,
            sample_catalog(),
            Arc::new(KeywordEmbedder::default()),
            Arc::new(ScriptedCompleter::new(answer)),
            Arc::new(FixedTranscriber(spoken.to_string())),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_voice_request_to_saved_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let answer = r#"{"tracks": [{"filepath": "/music/ambient/drift.flac", "title": "Drift", "artist": "Hammock"}]}"#;
        let orchestrator = orchestrator(answer, "calm ambient music for reading", dir.path()).await;

        let generation = orchestrator
            .generate_from_voice(&dir.path().join("clip.wav"))
            .await
            .unwrap();
        assert_eq!(generation.playlist.description, "calm ambient music for reading");
        assert_eq!(generation.playlist.tracks[0].title, "Drift");

        orchestrator.save(&generation.playlist).await.unwrap();
        let saved = orchestrator.store().list().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, generation.playlist.id);
    }

    #[tokio::test]
    async fn test_search_uses_built_index() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = orchestrator("{}", "", dir.path()).await;

        assert_eq!(orchestrator.catalog().len(), 5);
        let results = orchestrator.search("classical piano", 1).await.unwrap();
        assert_eq!(results[0].document.metadata.artist, "Chopin");
    }

    #[tokio::test]
    async fn test_start_fails_for_missing_library() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.library.music_dir = dir.path().join("missing").to_string_lossy().into_owned();

        let result = Orchestrator::start(settings).await;
        assert!(matches!(result, Err(VirtuosaError::LibraryNotFound(_))));
    }
}
