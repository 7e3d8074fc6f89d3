//! Configuration settings for Virtuosa.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub library: LibrarySettings,
    pub backend: BackendSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub transcription: TranscriptionSettings,
    pub playlists: PlaylistSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.virtuosa".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Music library scanning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root directory of the music collection.
    pub music_dir: String,
    /// File extensions treated as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Include dotfiles and dot-directories.
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: "~/Music".to_string(),
            extensions: ["mp3", "flac", "m4a", "ogg", "opus", "wav", "aiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            follow_links: true,
            include_hidden: false,
        }
    }
}

/// Connection to the OpenAI-compatible model server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// API base URL (Ollama serves an OpenAI-compatible API under /v1).
    pub base_url: String,
    /// API key; falls back to OPENAI_API_KEY when unset.
    pub api_key: Option<String>,
    /// Timeout applied to every embedding and completion call.
    pub timeout_seconds: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434/v1".to_string(),
            api_key: None,
            timeout_seconds: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Requested dimensions; leave unset for models with a fixed size.
    pub dimensions: Option<u32>,
    /// Number of texts sent per embedding request.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            dimensions: None,
            batch_size: 64,
        }
    }
}

/// How the completion backend is asked to shape its answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// JSON schema constrained output.
    Schema,
    /// Generic JSON object mode.
    #[default]
    Json,
    /// Free text; relies on brace extraction only.
    Text,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "schema" => Ok(OutputMode::Schema),
            "json" => Ok(OutputMode::Json),
            "text" => Ok(OutputMode::Text),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// What to do with suggested tracks that were not among the candidates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroundingPolicy {
    /// Drop them and keep the rest.
    #[default]
    Filter,
    /// Fail the whole request.
    Reject,
}

impl std::str::FromStr for GroundingPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "filter" => Ok(GroundingPolicy::Filter),
            "reject" => Ok(GroundingPolicy::Reject),
            _ => Err(format!("Unknown grounding policy: {}", s)),
        }
    }
}

/// Playlist generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// LLM model for playlist generation.
    pub model: String,
    /// Number of candidate tracks retrieved per request.
    pub candidates: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response shaping requested from the backend.
    pub output_mode: OutputMode,
    /// Handling of tracks outside the retrieved candidates.
    pub grounding: GroundingPolicy,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            candidates: 50,
            temperature: 0.2,
            output_mode: OutputMode::Json,
            grounding: GroundingPolicy::Filter,
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// API base of the transcription service; defaults to the model backend.
    pub base_url: Option<String>,
    /// API key override for the transcription service.
    pub api_key: Option<String>,
    /// Whisper model to use.
    pub model: String,
    /// Optional ISO-639-1 language hint.
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: "whisper-1".to_string(),
            language: None,
        }
    }
}

/// Playlist persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// JSON file holding saved playlists.
    pub path: String,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            path: "~/.virtuosa/playlists.json".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum accepted upload size for voice clips, in megabytes.
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_mb: 25,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VirtuosaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("virtuosa")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded music directory path.
    pub fn music_dir(&self) -> PathBuf {
        Self::expand_path(&self.library.music_dir)
    }

    /// Tracing filter for the crate: each `-v` raises the level past the configured one.
    pub fn log_filter(&self, verbose: u8) -> String {
        let level = match verbose {
            0 => self.general.log_level.trim(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        format!("virtuosa={}", level)
    }

    /// Get the expanded playlists file path.
    pub fn playlists_path(&self) -> PathBuf {
        Self::expand_path(&self.playlists.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_local_ollama() {
        let settings = Settings::default();
        assert_eq!(settings.backend.base_url, "http://127.0.0.1:11434/v1");
        assert_eq!(settings.generation.candidates, 50);
        assert_eq!(settings.generation.grounding, GroundingPolicy::Filter);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [library]
            music_dir = "/srv/music"

            [generation]
            output_mode = "schema"
            grounding = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(settings.music_dir(), PathBuf::from("/srv/music"));
        assert_eq!(settings.generation.output_mode, OutputMode::Schema);
        assert_eq!(settings.generation.grounding, GroundingPolicy::Reject);
        assert_eq!(settings.generation.candidates, 50);
        assert!(settings.library.extensions.contains(&"mp3".to_string()));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.server.port = 8080;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 8080);
    }

    #[test]
    fn test_log_filter_uses_configured_level_without_flags() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_filter(0), "virtuosa=warn");

        settings.general.log_level = "error".to_string();
        assert_eq!(settings.log_filter(0), "virtuosa=error");
        assert_eq!(settings.log_filter(2), "virtuosa=debug");
        assert_eq!(settings.log_filter(5), "virtuosa=trace");
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("SCHEMA".parse::<OutputMode>().unwrap(), OutputMode::Schema);
        assert!("xml".parse::<OutputMode>().is_err());
        assert_eq!("reject".parse::<GroundingPolicy>().unwrap(), GroundingPolicy::Reject);
    }
}
