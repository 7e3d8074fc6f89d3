//! Client setup for OpenAI-compatible backends (OpenAI, Ollama, local Whisper servers).

use crate::error::{Result, VirtuosaError};
use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use std::time::Duration;

/// Default timeout for backend requests (2 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create a client with a custom timeout.
///
/// Without an explicit key the `OPENAI_API_KEY` environment variable is used,
/// which local backends such as Ollama simply ignore.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut config = OpenAIConfig::default().with_api_base(api_base.trim_end_matches('/'));
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Map a client error onto the backend error kinds.
///
/// Transport failures become `BackendTimeout`/`BackendUnavailable` so callers
/// can tell retryable outages from API-level rejections.
pub fn map_backend_error(context: &str, err: OpenAIError) -> VirtuosaError {
    match err {
        OpenAIError::Reqwest(e) if e.is_timeout() => {
            VirtuosaError::BackendTimeout(format!("{}: {}", context, e))
        }
        OpenAIError::Reqwest(e) => VirtuosaError::BackendUnavailable(format!("{}: {}", context, e)),
        other => VirtuosaError::OpenAI(format!("{}: {}", context, other)),
    }
}
