//! Vector store abstraction for Virtuosa.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;

pub use memory::MemoryVectorStore;

use crate::error::Result;
use crate::library::Track;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A retrievable unit: the text matched by similarity search plus the track it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Human-readable summary sentence that gets embedded.
    pub content: String,
    /// Full track metadata, including the filepath.
    pub metadata: Track,
}

impl Document {
    pub fn filepath(&self) -> &str {
        &self.metadata.filepath
    }
}

/// A document together with its embedding vector.
#[derive(Debug, Clone)]
pub struct EmbeddedDocument {
    pub document: Document,
    pub embedding: Vec<f32>,
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk insert documents; an existing document with the same filepath is replaced.
    async fn upsert_batch(&self, docs: Vec<EmbeddedDocument>) -> Result<usize>;

    /// Search for similar documents.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot_product / (norm_a * norm_b);
    if similarity.is_nan() {
        return 0.0;
    }
    similarity
}
