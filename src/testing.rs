//! Test doubles shared by unit tests.

use crate::completion::{Completer, CompletionRequest};
use crate::embedding::Embedder;
use crate::error::{Result, VirtuosaError};
use crate::library::{Catalog, Track, TrackTags};
use crate::transcription::Transcriber;
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const VOCABULARY: &[&str] = &[
    "rock", "ambient", "jazz", "hip-hop", "classical", "workout", "calm", "energetic", "gym",
    "piano", "night",
];

/// Bag-of-keywords embedder: deterministic and dependency free.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    fn vectorize(text: &str) -> Vec<f32> {
        let text = text.to_lowercase();
        VOCABULARY
            .iter()
            .map(|word| text.matches(word).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }
}

/// Embedder whose backend is never reachable.
pub struct OfflineEmbedder;

#[async_trait]
impl Embedder for OfflineEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(VirtuosaError::BackendUnavailable("connection refused".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(VirtuosaError::BackendUnavailable("connection refused".to_string()))
    }
}

/// Completer that returns a canned answer and records the prompts it saw.
pub struct ScriptedCompleter {
    answer: String,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompleter {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Completer for ScriptedCompleter {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.answer.clone())
    }
}

/// Transcriber returning a fixed text.
pub struct FixedTranscriber(pub String);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub fn track(path: &str, title: &str, artist: &str, genre: &str) -> Track {
    Track::from_tags(
        Path::new(path),
        TrackTags {
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
            genre: Some(genre.to_string()),
            duration: 240,
            bitrate: 320,
            ..Default::default()
        },
    )
}

pub fn sample_catalog() -> Catalog {
    Catalog::from_tracks(vec![
        track("/music/rock/thunderstruck.mp3", "Thunderstruck", "AC/DC", "Rock"),
        track("/music/ambient/drift.flac", "Drift", "Hammock", "Ambient"),
        track("/music/hiphop/pump_it.mp3", "Pump It", "Black Eyed Peas", "Hip-Hop"),
        track("/music/jazz/blue_in_green.mp3", "Blue in Green", "Miles Davis", "Jazz"),
        track("/music/classical/nocturne.mp3", "Nocturne Op. 9 No. 2", "Chopin", "Classical Piano"),
    ])
}
