//! Configuration module for Virtuosa.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PlaylistPrompts, Prompts};
pub use settings::{
    BackendSettings, EmbeddingSettings, GeneralSettings, GenerationSettings, GroundingPolicy,
    LibrarySettings, OutputMode, PlaylistSettings, PromptSettings, ServerSettings, Settings,
    TranscriptionSettings,
};
