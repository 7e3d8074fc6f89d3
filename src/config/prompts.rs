//! Prompt templates for Virtuosa.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub playlist: PlaylistPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for playlist generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistPrompts {
    pub system: String,
    pub user: String,
}

impl Default for PlaylistPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a music curator building playlists from a personal music library.

Guidelines:
- Use only songs listed in the provided library excerpt
- Copy each song's filepath exactly as it is given, character for character
- Pick songs whose genre, tempo, era and artist match the request's mood and style
- Never invent songs, artists or filepaths
- Answer with a single JSON object and nothing else"#
                .to_string(),

            user: r#"Based on the following request: "{{description}}"
Create a playlist using only the available songs in the library.

Available songs:
{{context}}

Return a JSON response with the following structure:
{
    "tracks": [
        {"filepath": "/path/to/song.mp3",
         "title": "Song Title",
         "artist": "Artist Name"}
    ]
}
Include only songs that match the request's mood and style."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let playlist_path = custom_path.join("playlist.toml");
            if playlist_path.exists() {
                let content = std::fs::read_to_string(&playlist_path)?;
                prompts.playlist = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are resolved in one left-to-right pass; inserted values are
    /// never scanned again, and unknown placeholders are kept as written.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find("}}") else {
                result.push_str(&rest[start..]);
                return result;
            };

            let key = &after[..end];
            match vars.get(key) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
