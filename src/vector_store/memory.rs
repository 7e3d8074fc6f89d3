//! In-memory vector store implementation.
//!
//! The index is rebuilt from the library on every start, so this is the only backend.

use super::{cosine_similarity, EmbeddedDocument, SearchResult, VectorStore};
use crate::error::{Result, VirtuosaError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store. Documents keep their insertion order, which
/// breaks ties between equal scores.
pub struct MemoryVectorStore {
    documents: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    entries: Vec<EmbeddedDocument>,
    positions: HashMap<String, usize>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Store::default()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> VirtuosaError {
    VirtuosaError::VectorStore("store lock poisoned".to_string())
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: Vec<EmbeddedDocument>) -> Result<usize> {
        let mut store = self.documents.write().map_err(poisoned)?;
        let count = docs.len();
        for doc in docs {
            let key = doc.document.filepath().to_string();
            match store.positions.get(&key) {
                Some(&i) => store.entries[i] = doc,
                None => {
                    let i = store.entries.len();
                    store.positions.insert(key, i);
                    store.entries.push(doc);
                }
            }
        }
        Ok(count)
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let store = self.documents.read().map_err(poisoned)?;
        Ok(rank(&store.entries, query_embedding, limit))
    }

    async fn document_count(&self) -> Result<usize> {
        let store = self.documents.read().map_err(poisoned)?;
        Ok(store.entries.len())
    }
}

fn rank(
    entries: &[EmbeddedDocument],
    query_embedding: &[f32],
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = entries
        .iter()
        .map(|entry| SearchResult {
            document: entry.document.clone(),
            score: cosine_similarity(query_embedding, &entry.embedding),
        })
        .collect();

    // Stable sort keeps insertion order among equal scores
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);
    results
}
