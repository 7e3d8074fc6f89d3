//! Track catalog: the normalized, in-memory view of the scanned music library.

mod scan;

pub use scan::{is_audio_file, read_track, scan};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Sentinel for free-text fields missing from the tags.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for missing track and disc numbers.
pub const UNKNOWN_ORDINAL: &str = "0";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Absolute path of the audio file; unique within a catalog.
    pub filepath: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub composer: String,
    pub genre: String,
    pub year: String,
    pub track_number: String,
    pub disc_number: String,
    /// Free text, not guaranteed numeric.
    pub bpm: String,
    /// Duration in whole seconds.
    pub duration: u64,
    /// Bitrate in kbps.
    pub bitrate: u32,
}

/// Raw tag values as read from a file, before defaulting.
#[derive(Debug, Clone, Default)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub track_number: Option<String>,
    pub disc_number: Option<String>,
    pub bpm: Option<String>,
    pub duration: u64,
    pub bitrate: u32,
}

impl Track {
    /// Build a track from tags, filling every missing field with its sentinel.
    ///
    /// The title falls back to the file stem rather than `Unknown`.
    pub fn from_tags(path: &Path, tags: TrackTags) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            filepath: path.to_string_lossy().into_owned(),
            title: or_default(tags.title, &stem),
            artist: or_default(tags.artist, UNKNOWN),
            album: or_default(tags.album, UNKNOWN),
            album_artist: or_default(tags.album_artist, UNKNOWN),
            composer: or_default(tags.composer, UNKNOWN),
            genre: or_default(tags.genre, UNKNOWN),
            year: or_default(tags.year, UNKNOWN),
            track_number: or_default(tags.track_number, UNKNOWN_ORDINAL),
            disc_number: or_default(tags.disc_number, UNKNOWN_ORDINAL),
            bpm: or_default(tags.bpm, UNKNOWN),
            duration: tags.duration,
            bitrate: tags.bitrate,
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// A file that could not be turned into a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTrack {
    pub path: PathBuf,
    pub reason: String,
}

/// The set of successfully scanned tracks plus everything that was skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    tracks: Vec<Track>,
    skipped: Vec<SkippedTrack>,
    #[serde(skip)]
    paths: HashSet<String>,
}

impl Catalog {
    /// Build a catalog from tracks; later duplicates of a filepath are dropped.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut catalog = Self::default();
        for track in tracks {
            catalog.push(track);
        }
        catalog
    }

    /// Add a track unless its filepath is already present.
    pub fn push(&mut self, track: Track) -> bool {
        if !self.paths.insert(track.filepath.clone()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Record a file that failed to load.
    pub fn skip(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.skipped.push(SkippedTrack {
            path,
            reason: reason.into(),
        });
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn skipped(&self) -> &[SkippedTrack] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Sort tracks by filepath.
    pub(crate) fn sort(&mut self) {
        self.tracks.sort_by(|a, b| a.filepath.cmp(&b.filepath));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tags_get_sentinels() {
        let track = Track::from_tags(Path::new("/music/Band/01 Opening.mp3"), TrackTags::default());

        assert_eq!(track.filepath, "/music/Band/01 Opening.mp3");
        assert_eq!(track.title, "01 Opening");
        assert_eq!(track.artist, UNKNOWN);
        assert_eq!(track.album_artist, UNKNOWN);
        assert_eq!(track.composer, UNKNOWN);
        assert_eq!(track.genre, UNKNOWN);
        assert_eq!(track.year, UNKNOWN);
        assert_eq!(track.bpm, UNKNOWN);
        assert_eq!(track.track_number, "0");
        assert_eq!(track.disc_number, "0");
        assert_eq!(track.duration, 0);
        assert_eq!(track.bitrate, 0);
    }

    #[test]
    fn test_blank_tags_count_as_missing() {
        let tags = TrackTags {
            title: Some("   ".to_string()),
            artist: Some("  Nina Simone ".to_string()),
            genre: Some(String::new()),
            ..Default::default()
        };
        let track = Track::from_tags(Path::new("/music/feeling_good.flac"), tags);

        assert_eq!(track.title, "feeling_good");
        assert_eq!(track.artist, "Nina Simone");
        assert_eq!(track.genre, UNKNOWN);
    }

    #[test]
    fn test_catalog_dedups_by_filepath() {
        let a = Track::from_tags(Path::new("/m/a.mp3"), TrackTags::default());
        let b = Track::from_tags(Path::new("/m/b.mp3"), TrackTags::default());
        let mut dup = a.clone();
        dup.title = "Duplicate".to_string();

        let mut catalog = Catalog::from_tracks(vec![b, a, dup]);
        assert_eq!(catalog.len(), 2);

        catalog.sort();
        let titles: Vec<&str> = catalog.tracks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
