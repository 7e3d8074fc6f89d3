//! Embeddings over an OpenAI-compatible endpoint (OpenAI, Ollama).

use super::Embedder;
use crate::config::{BackendSettings, EmbeddingSettings};
use crate::error::{Result, VirtuosaError};
use crate::openai::{create_client_with_timeout, map_backend_error};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-compatible embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
    batch_size: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder from the backend and embedding settings.
    pub fn from_settings(backend: &BackendSettings, embedding: &EmbeddingSettings) -> Result<Self> {
        let client = create_client_with_timeout(
            &backend.base_url,
            backend.api_key.as_deref(),
            Duration::from_secs(backend.timeout_seconds),
        )?;

        Ok(Self {
            client,
            model: embedding.model.clone(),
            dimensions: embedding.dimensions,
            batch_size: embedding.batch_size.max(1),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| VirtuosaError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let mut args = CreateEmbeddingRequestArgs::default();
            args.model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()));
            if let Some(dimensions) = self.dimensions {
                args.dimensions(dimensions);
            }

            let request = args
                .build()
                .map_err(|e| VirtuosaError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| map_backend_error("Embedding request", e))?;

            if response.data.len() != chunk.len() {
                return Err(VirtuosaError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    chunk.len(),
                    response.data.len()
                )));
            }

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }
}
