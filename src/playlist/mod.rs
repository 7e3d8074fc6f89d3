//! Playlists: the result of a generation request and their on-disk collection.

mod store;

pub use store::PlaylistStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters of the request kept in a playlist name.
pub const NAME_CHARS: usize = 30;

/// Appended to every truncated playlist name.
pub const ELLIPSIS: &str = "...";

/// One playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub filepath: String,
    pub title: String,
    pub artist: String,
}

/// A generated playlist. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Uuid,
    /// Display name derived from the request.
    pub name: String,
    /// The full request text.
    pub description: String,
    pub tracks: Vec<PlaylistTrack>,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a playlist for a request.
    pub fn new(description: &str, tracks: Vec<PlaylistTrack>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: playlist_name(description),
            description: description.to_string(),
            tracks,
            created_at: Utc::now(),
        }
    }
}

/// First [`NAME_CHARS`] characters of the request followed by [`ELLIPSIS`].
///
/// Counts `char`s, so multi-byte text is never split mid-codepoint.
pub fn playlist_name(description: &str) -> String {
    let mut name: String = description.chars().take(NAME_CHARS).collect();
    name.push_str(ELLIPSIS);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_truncates_to_thirty_chars() {
        let description = "workout music for the gym today";
        let playlist = Playlist::new(description, Vec::new());

        assert_eq!(playlist.name, "workout music for the gym toda...");
        assert_eq!(playlist.description, description);
    }

    #[test]
    fn test_short_description_keeps_marker() {
        assert_eq!(playlist_name("chill"), "chill...");
        assert_eq!(playlist_name(""), "...");
    }

    #[test]
    fn test_name_is_codepoint_safe() {
        let description = "música tranquila para la noche, sin prisa ☕🌙 y más";
        let name = playlist_name(description);

        assert_eq!(name.chars().count(), NAME_CHARS + ELLIPSIS.len());
        assert!(name.starts_with("música tranquila para la noche"));

        let emoji = "🎸".repeat(40);
        assert_eq!(playlist_name(&emoji), format!("{}...", "🎸".repeat(30)));
    }

    #[test]
    fn test_playlist_serializes_expected_fields() {
        let playlist = Playlist::new(
            "late night jazz",
            vec![PlaylistTrack {
                filepath: "/m/blue.mp3".to_string(),
                title: "Blue in Green".to_string(),
                artist: "Miles Davis".to_string(),
            }],
        );
        let value = serde_json::to_value(&playlist).unwrap();

        assert_eq!(value["name"], "late night jazz...");
        assert_eq!(value["description"], "late night jazz");
        assert_eq!(value["tracks"][0]["filepath"], "/m/blue.mp3");
        assert!(value["id"].is_string());
    }
}
