//! Document encoding: catalog tracks into retrievable text.

use crate::library::{Track, UNKNOWN};
use crate::vector_store::Document;

/// Encode every track into a document, preserving order.
pub fn encode(catalog: &[Track]) -> Vec<Document> {
    catalog
        .iter()
        .map(|track| Document {
            content: describe(track),
            metadata: track.clone(),
        })
        .collect()
}

/// The sentence embedded for a track. Field order and inclusion determine
/// what similarity search can match on.
pub fn describe(track: &Track) -> String {
    format!(
        "Track: {} by {} from album {}. Album Artist: {}. Composer: {}. Genre: {}. Year: {}. Duration: {} seconds. BPM: {}. ",
        or_unknown(&track.title),
        or_unknown(&track.artist),
        or_unknown(&track.album),
        or_unknown(&track.album_artist),
        or_unknown(&track.composer),
        or_unknown(&track.genre),
        or_unknown(&track.year),
        track.duration,
        or_unknown(&track.bpm),
    )
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::TrackTags;
    use crate::testing::sample_catalog;
    use std::path::Path;

    #[test]
    fn test_describe_full_track() {
        let track = Track::from_tags(
            Path::new("/music/so_what.mp3"),
            TrackTags {
                title: Some("So What".to_string()),
                artist: Some("Miles Davis".to_string()),
                album: Some("Kind of Blue".to_string()),
                album_artist: Some("Miles Davis".to_string()),
                composer: Some("Miles Davis".to_string()),
                genre: Some("Jazz".to_string()),
                year: Some("1959".to_string()),
                bpm: Some("136".to_string()),
                duration: 562,
                ..Default::default()
            },
        );

        assert_eq!(
            describe(&track),
            "Track: So What by Miles Davis from album Kind of Blue. Album Artist: Miles Davis. \
             Composer: Miles Davis. Genre: Jazz. Year: 1959. Duration: 562 seconds. BPM: 136. "
        );
    }

    #[test]
    fn test_missing_fields_render_sentinels() {
        let track = Track::from_tags(Path::new("/music/untitled.mp3"), TrackTags::default());
        let text = describe(&track);

        assert!(text.starts_with("Track: untitled by Unknown from album Unknown."));
        assert!(text.contains("Album Artist: Unknown."));
        assert!(text.contains("Composer: Unknown."));
        assert!(text.contains("Genre: Unknown."));
        assert!(text.contains("Year: Unknown."));
        assert!(text.contains("Duration: 0 seconds."));
        assert!(text.contains("BPM: Unknown."));
    }

    #[test]
    fn test_blank_fields_never_render_empty() {
        let mut track = Track::from_tags(Path::new("/music/x.mp3"), TrackTags::default());
        track.artist = String::new();
        track.genre = "  ".to_string();

        let text = describe(&track);
        assert!(text.contains("by Unknown from"));
        assert!(text.contains("Genre: Unknown."));
        assert!(!text.contains(":  ."));
    }

    #[test]
    fn test_encode_is_one_to_one_and_ordered() {
        let catalog = sample_catalog();
        let documents = encode(catalog.tracks());

        assert_eq!(documents.len(), catalog.len());
        for (doc, track) in documents.iter().zip(catalog.tracks()) {
            assert_eq!(&doc.metadata, track);
            assert!(doc.content.contains(&track.title));
        }
        assert!(encode(&[]).is_empty());
    }
}
