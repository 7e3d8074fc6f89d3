//! Playlist generation: retrieve candidates, prompt the model, parse and ground its answer.

use super::document::encode;
use super::extract::{parse_tracks, playlist_schema, SuggestedTrack};
use super::index::{format_candidates_for_prompt, SimilarityIndex};
use crate::completion::{Completer, CompletionRequest};
use crate::config::{GenerationSettings, GroundingPolicy, OutputMode, Prompts};
use crate::embedding::Embedder;
use crate::error::{Result, VirtuosaError};
use crate::library::Catalog;
use crate::playlist::{Playlist, PlaylistTrack};
use crate::vector_store::SearchResult;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument, warn};

/// Generates playlists grounded in the indexed library.
pub struct PlaylistGenerator {
    completer: Arc<dyn Completer>,
    index: OnceLock<Arc<SimilarityIndex>>,
    prompts: Prompts,
    candidates: usize,
    output_mode: OutputMode,
    grounding: GroundingPolicy,
}

/// A generated playlist together with what it was generated from.
#[derive(Debug, Clone)]
pub struct Generation {
    pub playlist: Playlist,
    /// Candidates retrieved for the request, best first.
    pub candidates: Vec<SearchResult>,
    /// Filepaths the model suggested that were not among the candidates.
    pub dropped: Vec<String>,
}

impl PlaylistGenerator {
    /// Create a generator. It cannot serve requests until an index is installed.
    pub fn new(completer: Arc<dyn Completer>, settings: &GenerationSettings) -> Self {
        Self {
            completer,
            index: OnceLock::new(),
            prompts: Prompts::default(),
            candidates: settings.candidates,
            output_mode: settings.output_mode,
            grounding: settings.grounding,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Encode the catalog, build the index and install it. Returns the number
    /// of indexed documents.
    #[instrument(skip_all, fields(tracks = catalog.len()))]
    pub async fn initialize(&self, embedder: Arc<dyn Embedder>, catalog: &Catalog) -> Result<usize> {
        let documents = encode(catalog.tracks());
        let index = SimilarityIndex::build(embedder, documents).await?;
        let len = index.len();
        self.install_index(Arc::new(index))?;
        Ok(len)
    }

    /// Install a prebuilt index. Only the first installation succeeds.
    pub fn install_index(&self, index: Arc<SimilarityIndex>) -> Result<()> {
        self.index
            .set(index)
            .map_err(|_| VirtuosaError::InvalidInput("index is already initialized".to_string()))
    }

    pub fn is_initialized(&self) -> bool {
        self.index.get().is_some()
    }

    /// The installed index.
    pub fn index(&self) -> Result<&Arc<SimilarityIndex>> {
        self.index.get().ok_or(VirtuosaError::NotInitialized)
    }

    /// Generate a playlist for a free-text request.
    pub async fn generate(&self, description: &str) -> Result<Playlist> {
        Ok(self.generate_detailed(description).await?.playlist)
    }

    /// Generate a playlist and report the candidates and dropped suggestions.
    #[instrument(skip(self), fields(description = %description))]
    pub async fn generate_detailed(&self, description: &str) -> Result<Generation> {
        let index = self.index()?;

        if description.trim().is_empty() {
            return Err(VirtuosaError::InvalidInput(
                "playlist description is empty".to_string(),
            ));
        }

        // Retrieval uses the request itself, not the assembled prompt
        let candidates = index.query(description, self.candidates).await?;
        info!("Retrieved {} candidate tracks", candidates.len());
        if candidates.is_empty() {
            return Err(VirtuosaError::EmptyPlaylist);
        }

        let request = self.build_request(description, &candidates);
        let answer = self.completer.complete(&request).await?;
        debug!("Model answer: {}", &answer[..floor_char_boundary(&answer, 500)]);

        let suggested = parse_tracks(&answer)?;
        let (tracks, dropped) = self.ground(suggested, &candidates)?;

        let playlist = Playlist::new(description, tracks);
        info!("Generated playlist '{}' with {} tracks", playlist.name, playlist.tracks.len());

        Ok(Generation {
            playlist,
            candidates,
            dropped,
        })
    }

    fn build_request(&self, description: &str, candidates: &[SearchResult]) -> CompletionRequest {
        let mut vars = HashMap::new();
        vars.insert("description".to_string(), description.to_string());
        vars.insert("context".to_string(), format_candidates_for_prompt(candidates));

        CompletionRequest {
            system: self.prompts.render_with_custom(&self.prompts.playlist.system, &vars),
            user: self.prompts.render_with_custom(&self.prompts.playlist.user, &vars),
            output_mode: self.output_mode,
            schema: (self.output_mode == OutputMode::Schema).then(playlist_schema),
        }
    }

    /// Keep only suggestions that were among the candidates, filling missing
    /// titles and artists from the library.
    fn ground(
        &self,
        suggested: Vec<SuggestedTrack>,
        candidates: &[SearchResult],
    ) -> Result<(Vec<PlaylistTrack>, Vec<String>)> {
        let known: HashMap<&str, &SearchResult> =
            candidates.iter().map(|c| (c.document.filepath(), c)).collect();

        let mut seen = HashSet::new();
        let mut tracks = Vec::new();
        let mut dropped = Vec::new();

        for track in suggested {
            let Some(candidate) = known.get(track.filepath.as_str()) else {
                dropped.push(track.filepath);
                continue;
            };
            if !seen.insert(track.filepath.clone()) {
                continue;
            }

            let metadata = &candidate.document.metadata;
            tracks.push(PlaylistTrack {
                title: track.title.unwrap_or_else(|| metadata.title.clone()),
                artist: track.artist.unwrap_or_else(|| metadata.artist.clone()),
                filepath: track.filepath,
            });
        }

        if !dropped.is_empty() {
            match self.grounding {
                GroundingPolicy::Reject => return Err(VirtuosaError::Ungrounded(dropped)),
                GroundingPolicy::Filter => {
                    warn!("Dropped {} tracks not in the library: {:?}", dropped.len(), dropped)
                }
            }
        }

        if tracks.is_empty() {
            return Err(VirtuosaError::EmptyPlaylist);
        }

        Ok((tracks, dropped))
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
