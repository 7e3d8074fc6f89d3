//! Error types for Virtuosa.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for Virtuosa operations.
#[derive(Error, Debug)]
pub enum VirtuosaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Music library not found: {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("Failed to load track {}: {reason}", path.display())]
    TrackLoadSkipped { path: PathBuf, reason: String },

    #[error("Playlist generator is not initialized; build the index first")]
    NotInitialized,

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend timed out: {0}")]
    BackendTimeout(String),

    #[error("No JSON object found in model response")]
    NoJsonFound,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Model suggested tracks that are not in the library: {}", .0.join(", "))]
    Ungrounded(Vec<String>),

    #[error("Model returned no usable tracks for this request")]
    EmptyPlaylist,

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VirtuosaError {
    /// Whether the failure came from the model output rather than the transport.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            VirtuosaError::NoJsonFound
                | VirtuosaError::MalformedResponse(_)
                | VirtuosaError::Ungrounded(_)
                | VirtuosaError::EmptyPlaylist
        )
    }

    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VirtuosaError::BackendUnavailable(_) | VirtuosaError::BackendTimeout(_)
        ) || self.is_generation_failure()
    }
}

/// Result type alias for Virtuosa operations.
pub type Result<T> = std::result::Result<T, VirtuosaError>;
