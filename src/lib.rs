//! Virtuosa - voice-driven playlists from a local music library
//!
//! Scans a music collection, indexes track metadata for semantic search, and
//! asks a language model to assemble playlists from spoken or typed requests.
//!
//! # Overview
//!
//! A request flows through the pipeline like this:
//! - A recorded request is transcribed to text (`transcription`)
//! - The text is embedded and matched against the library index (`rag::index`)
//! - The best candidates are handed to a language model (`completion`)
//! - The model's answer is parsed and checked against the library (`rag`)
//! - The result becomes a named playlist that can be saved (`playlist`)
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `library` - Library scanning and the track catalog
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector store abstraction
//! - `completion` - Chat completion backends
//! - `transcription` - Speech-to-text transcription
//! - `rag` - Track documents, similarity index and playlist generation
//! - `playlist` - Playlists and their persistent collection
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use virtuosa::config::Settings;
//! use virtuosa::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::start(settings).await?;
//!
//!     let generation = orchestrator.generate("songs for a rainy sunday").await?;
//!     println!("{} ({} tracks)", generation.playlist.name, generation.playlist.tracks.len());
//!     orchestrator.save(&generation.playlist).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod library;
pub mod openai;
pub mod orchestrator;
pub mod playlist;
pub mod rag;
pub mod transcription;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{Result, VirtuosaError};
