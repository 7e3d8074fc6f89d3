//! Parsing playlist JSON out of free-form model answers.

use crate::error::{Result, VirtuosaError};
use serde_json::Value;

/// A track as suggested by the model, before grounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedTrack {
    pub filepath: String,
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Locate the candidate JSON payload: first `{` through last `}`, inclusive.
pub fn extract_json(raw: &str) -> Result<&str> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&raw[start..=end]),
        _ => Err(VirtuosaError::NoJsonFound),
    }
}

/// Parse a model answer into suggested tracks.
///
/// The whole answer is tried as JSON first, which is what structured output
/// modes produce; brace extraction is the fallback for answers wrapped in prose.
pub fn parse_tracks(raw: &str) -> Result<Vec<SuggestedTrack>> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(raw.trim()) {
        return check_shape(value);
    }

    let payload = extract_json(raw)?;
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| VirtuosaError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    check_shape(value)
}

fn check_shape(value: Value) -> Result<Vec<SuggestedTrack>> {
    let tracks = value
        .get("tracks")
        .ok_or_else(|| VirtuosaError::MalformedResponse("missing \"tracks\" key".to_string()))?
        .as_array()
        .ok_or_else(|| VirtuosaError::MalformedResponse("\"tracks\" is not an array".to_string()))?;

    tracks
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let object = entry.as_object().ok_or_else(|| {
                VirtuosaError::MalformedResponse(format!("track {} is not an object", i))
            })?;

            let filepath = object
                .get("filepath")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    VirtuosaError::MalformedResponse(format!("track {} has no \"filepath\"", i))
                })?;

            Ok(SuggestedTrack {
                filepath: filepath.to_string(),
                title: string_field(object.get("title")),
                artist: string_field(object.get("artist")),
            })
        })
        .collect()
}

fn string_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// JSON schema of the expected answer, for schema-constrained output.
pub fn playlist_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "tracks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "filepath": { "type": "string" },
                        "title": { "type": "string" },
                        "artist": { "type": "string" }
                    },
                    "required": ["filepath", "title", "artist"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["tracks"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_strips_surrounding_noise() {
        let raw = "noise {\"tracks\":[]} trailing";
        assert_eq!(extract_json(raw).unwrap(), "{\"tracks\":[]}");
    }

    #[test]
    fn test_extract_json_spans_first_to_last_brace() {
        let raw = "Sure! {\"tracks\": [{\"filepath\": \"/a.mp3\"}]} Enjoy {the music}";
        assert_eq!(
            extract_json(raw).unwrap(),
            "{\"tracks\": [{\"filepath\": \"/a.mp3\"}]} Enjoy {the music}"
        );
    }

    #[test]
    fn test_extract_json_without_braces() {
        assert!(matches!(extract_json("no json here"), Err(VirtuosaError::NoJsonFound)));
        assert!(matches!(extract_json("only { opening"), Err(VirtuosaError::NoJsonFound)));
        assert!(matches!(extract_json("only closing }"), Err(VirtuosaError::NoJsonFound)));
        assert!(matches!(extract_json("} reversed {"), Err(VirtuosaError::NoJsonFound)));
    }

    #[test]
    fn test_parse_structured_answer() {
        let raw = r#"{"tracks": [{"filepath": "/m/a.mp3", "title": "A", "artist": "X"}, {"filepath": "/m/b.mp3"}]}"#;
        let tracks = parse_tracks(raw).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title.as_deref(), Some("A"));
        assert_eq!(tracks[1].filepath, "/m/b.mp3");
        assert_eq!(tracks[1].artist, None);
    }

    #[test]
    fn test_parse_answer_wrapped_in_markdown() {
        let raw = "Here is your playlist:\n```json\n{\"tracks\": [{\"filepath\": \"/m/a.mp3\"}]}\n```\nEnjoy!";
        let tracks = parse_tracks(raw).unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[test]
    fn test_parse_without_braces_is_no_json() {
        let err = parse_tracks("I could not find any songs, sorry.").unwrap_err();
        assert!(matches!(err, VirtuosaError::NoJsonFound));
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        let err = parse_tracks("result: {\"tracks\": [ {\"filepath\": } ]}").unwrap_err();
        assert!(matches!(err, VirtuosaError::MalformedResponse(msg) if msg.contains("invalid JSON")));
    }

    #[test]
    fn test_shape_errors_are_malformed() {
        for raw in [
            r#"{"songs": []}"#,
            r#"{"tracks": "none"}"#,
            r#"{"tracks": ["/m/a.mp3"]}"#,
            r#"{"tracks": [{"title": "No path"}]}"#,
            r#"{"tracks": [{"filepath": "  "}]}"#,
        ] {
            let err = parse_tracks(raw).unwrap_err();
            assert!(matches!(err, VirtuosaError::MalformedResponse(_)), "{}", raw);
        }
    }

    #[test]
    fn test_schema_requires_tracks() {
        let schema = playlist_schema();
        assert_eq!(schema["required"][0], "tracks");
        assert_eq!(schema["properties"]["tracks"]["items"]["required"][0], "filepath");
    }
}
