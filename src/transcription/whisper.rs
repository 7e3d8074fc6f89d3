//! Whisper transcription over an OpenAI-compatible endpoint.

use super::Transcriber;
use crate::config::{BackendSettings, TranscriptionSettings};
use crate::error::{Result, VirtuosaError};
use crate::openai::{create_client_with_timeout, map_backend_error};
use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    language: Option<String>,
}

impl WhisperTranscriber {
    /// Create a transcriber; the transcription section may override the backend address.
    pub fn from_settings(backend: &BackendSettings, settings: &TranscriptionSettings) -> Result<Self> {
        let base_url = settings.base_url.as_deref().unwrap_or(&backend.base_url);
        let api_key = settings.api_key.as_deref().or(backend.api_key.as_deref());
        let client = create_client_with_timeout(
            base_url,
            api_key,
            Duration::from_secs(backend.timeout_seconds),
        )?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            language: settings.language.clone(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let file_bytes = tokio::fs::read(audio_path).await?;
        if file_bytes.is_empty() {
            return Err(VirtuosaError::InvalidInput("audio file is empty".to_string()));
        }

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("request.wav")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| VirtuosaError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| map_backend_error("Transcription request", e))?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(VirtuosaError::InvalidInput(
                "no speech recognized in the recording".to_string(),
            ));
        }

        debug!("Transcribed request: {}", text);
        Ok(text)
    }
}
