//! Retrieval-augmented playlist generation.
//!
//! Tracks are encoded into documents, embedded into a similarity index, and
//! the best candidates for a request are handed to the language model, whose
//! answer is parsed and checked against the candidates.

pub mod document;
pub mod extract;
mod generator;
pub mod index;

pub use document::encode;
pub use extract::{extract_json, parse_tracks, SuggestedTrack};
pub use generator::{Generation, PlaylistGenerator};
pub use index::{SimilarityIndex, DEFAULT_CANDIDATES};
