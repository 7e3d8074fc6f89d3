//! Chat completions over an OpenAI-compatible endpoint.

use super::{Completer, CompletionRequest};
use crate::config::{BackendSettings, GenerationSettings, OutputMode};
use crate::error::{Result, VirtuosaError};
use crate::openai::{create_client_with_timeout, map_backend_error};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-compatible chat completer.
pub struct OpenAICompleter {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAICompleter {
    /// Create a completer from the backend and generation settings.
    pub fn from_settings(backend: &BackendSettings, generation: &GenerationSettings) -> Result<Self> {
        let client = create_client_with_timeout(
            &backend.base_url,
            backend.api_key.as_deref(),
            Duration::from_secs(backend.timeout_seconds),
        )?;

        Ok(Self {
            client,
            model: generation.model.clone(),
            temperature: generation.temperature,
        })
    }

    fn response_format(request: &CompletionRequest) -> Option<ResponseFormat> {
        match (request.output_mode, &request.schema) {
            (OutputMode::Text, _) => None,
            (OutputMode::Schema, Some(schema)) => Some(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some("A playlist drawn from the music library".to_string()),
                    name: "playlist".to_string(),
                    schema: Some(schema.clone()),
                    strict: Some(true),
                },
            }),
            _ => Some(ResponseFormat::JsonObject),
        }
    }
}

#[async_trait]
impl Completer for OpenAICompleter {
    #[instrument(skip(self, request), fields(model = %self.model, mode = ?request.output_mode))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system.clone())
                .build()
                .map_err(|e| VirtuosaError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user.clone())
                .build()
                .map_err(|e| VirtuosaError::OpenAI(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages)
            .temperature(self.temperature);
        if let Some(format) = Self::response_format(request) {
            args.response_format(format);
        }

        let chat_request = args
            .build()
            .map_err(|e| VirtuosaError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| map_backend_error("Completion request", e))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| VirtuosaError::MalformedResponse("Empty response from LLM".to_string()))?
            .clone();

        debug!("Completion returned {} bytes", answer.len());
        Ok(answer)
    }
}
