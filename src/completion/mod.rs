//! Text completion against a language-model backend.

mod openai;

pub use openai::OpenAICompleter;

use crate::config::OutputMode;
use crate::error::Result;
use async_trait::async_trait;

/// A single prompt submitted to the completion backend.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// User message.
    pub user: String,
    /// Requested output shaping.
    pub output_mode: OutputMode,
    /// JSON schema used when `output_mode` is `Schema`.
    pub schema: Option<serde_json::Value>,
}

/// Trait for completion backends.
///
/// The returned text carries no well-formedness guarantee, whatever output
/// mode was requested.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Submit a prompt and return the raw answer text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
