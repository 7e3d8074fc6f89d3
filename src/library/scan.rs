//! Library scanning: walk the music directory and read tags with lofty.

use super::{Catalog, Track, TrackTags};
use crate::config::LibrarySettings;
use crate::error::{Result, VirtuosaError};
use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};
use lofty::tag::Tag;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Check if a path has one of the configured audio extensions.
pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Scan a directory into a catalog.
///
/// The directory is resolved to an absolute path first, so every track's
/// filepath is absolute. Files that fail to load are recorded in
/// [`Catalog::skipped`] and logged; only a missing root directory is an error.
#[instrument(skip(settings), fields(dir = %dir.display()))]
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Catalog> {
    if !dir.is_dir() {
        return Err(VirtuosaError::LibraryNotFound(dir.to_path_buf()));
    }
    let dir = dir.canonicalize()?;

    let mut catalog = Catalog::default();

    let walker = WalkDir::new(&dir)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path, settings) {
            continue;
        }

        if path.to_str().is_none() {
            warn!("Skipping {}: path is not valid UTF-8", path.display());
            catalog.skip(path.to_path_buf(), "path is not valid UTF-8");
            continue;
        }

        match read_track(path) {
            Ok(track) => {
                debug!("Loaded {}", track.filepath);
                catalog.push(track);
            }
            Err(e) => {
                warn!("{}", e);
                let reason = match e {
                    VirtuosaError::TrackLoadSkipped { reason, .. } => reason,
                    other => other.to_string(),
                };
                catalog.skip(path.to_path_buf(), reason);
            }
        }
    }

    catalog.sort();
    info!(
        "Scanned {} tracks ({} skipped)",
        catalog.len(),
        catalog.skipped().len()
    );

    Ok(catalog)
}

/// Read one audio file into a track.
pub fn read_track(path: &Path) -> Result<Track> {
    let tagged = lofty::read_from_path(path).map_err(|e| VirtuosaError::TrackLoadSkipped {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let properties = tagged.properties();
    let mut tags = TrackTags {
        duration: properties.duration().as_secs(),
        bitrate: properties
            .audio_bitrate()
            .or(properties.overall_bitrate())
            .unwrap_or(0),
        ..Default::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        tags.title = get(tag, &ItemKey::TrackTitle);
        tags.artist = get(tag, &ItemKey::TrackArtist);
        tags.album = get(tag, &ItemKey::AlbumTitle);
        tags.album_artist = get(tag, &ItemKey::AlbumArtist);
        tags.composer = get(tag, &ItemKey::Composer);
        tags.genre = get(tag, &ItemKey::Genre);
        tags.year = get(tag, &ItemKey::RecordingDate).or_else(|| get(tag, &ItemKey::Year));
        tags.track_number = get(tag, &ItemKey::TrackNumber);
        tags.disc_number = get(tag, &ItemKey::DiscNumber);
        tags.bpm = get(tag, &ItemKey::Bpm).or_else(|| get(tag, &ItemKey::IntegerBpm));
    }

    Ok(Track::from_tags(path, tags))
}

fn get(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.get_string(key).map(|v| v.to_string())
}
