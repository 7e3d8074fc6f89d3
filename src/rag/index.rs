//! Similarity index over encoded documents.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{Document, EmbeddedDocument, MemoryVectorStore, SearchResult, VectorStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Number of candidates retrieved per playlist request.
pub const DEFAULT_CANDIDATES: usize = 50;

/// Embeds documents once and answers nearest-neighbor queries over them.
///
/// Read-only after [`SimilarityIndex::build`]; share it behind an `Arc`.
pub struct SimilarityIndex {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    len: usize,
}

impl SimilarityIndex {
    /// Build an in-memory index.
    pub async fn build(embedder: Arc<dyn Embedder>, documents: Vec<Document>) -> Result<Self> {
        Self::build_with_store(embedder, Arc::new(MemoryVectorStore::new()), documents).await
    }

    /// Build an index on top of the given vector store.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub async fn build_with_store(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        documents: Vec<Document>,
    ) -> Result<Self> {
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let entries: Vec<EmbeddedDocument> = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| EmbeddedDocument {
                document,
                embedding,
            })
            .collect();

        vector_store.upsert_batch(entries).await?;
        let len = vector_store.document_count().await?;
        info!("Indexed {} documents", len);

        Ok(Self {
            embedder,
            vector_store,
            len,
        })
    }

    /// Return the `k` documents most similar to `text`, best first.
    ///
    /// Always returns exactly `min(k, len)` results.
    #[instrument(skip(self), fields(query = %text))]
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 || self.len == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text).await?;
        let results = self.vector_store.search(&query_embedding, k).await?;
        debug!("Retrieved {} candidates", results.len());

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Format retrieved candidates for the generation prompt.
///
/// Each candidate is its literal document text, preceded by the filepath the
/// model has to cite.
pub fn format_candidates_for_prompt(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("---\nfilepath: {}\n{}\n---", r.document.filepath(), r.document.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VirtuosaError;
    use crate::rag::document::encode;
    use crate::testing::{sample_catalog, track, KeywordEmbedder, OfflineEmbedder};
    use std::sync::atomic::Ordering;

    async fn sample_index() -> SimilarityIndex {
        let documents = encode(sample_catalog().tracks());
        SimilarityIndex::build(Arc::new(KeywordEmbedder::default()), documents)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_ranks_matching_genre_first() {
        let index = sample_index().await;
        let results = index.query("some energetic rock", 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].document.metadata.title, "Thunderstruck");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_query_returns_min_of_k_and_len() {
        let index = sample_index().await;
        assert_eq!(index.len(), 5);

        assert_eq!(index.query("jazz", DEFAULT_CANDIDATES).await.unwrap().len(), 5);
        assert_eq!(index.query("jazz", 2).await.unwrap().len(), 2);
        assert!(index.query("jazz", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_never_exceeds_fifty() {
        let tracks: Vec<_> = (0..120)
            .map(|i| track(&format!("/music/bulk/{:03}.mp3", i), &format!("Song {}", i), "Band", "Rock"))
            .collect();
        let index = SimilarityIndex::build(Arc::new(KeywordEmbedder::default()), encode(&tracks))
            .await
            .unwrap();

        let results = index.query("rock", DEFAULT_CANDIDATES).await.unwrap();
        assert_eq!(results.len(), 50);
    }

    #[tokio::test]
    async fn test_empty_index_skips_embedding() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = SimilarityIndex::build(embedder.clone(), Vec::new()).await.unwrap();
        let calls_after_build = embedder.calls.load(Ordering::SeqCst);

        assert!(index.is_empty());
        assert!(index.query("anything", 50).await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), calls_after_build);
    }

    #[tokio::test]
    async fn test_build_fails_when_backend_unavailable() {
        let documents = encode(sample_catalog().tracks());
        let result = SimilarityIndex::build(Arc::new(OfflineEmbedder), documents).await;
        assert!(matches!(result, Err(VirtuosaError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_format_candidates_includes_filepath_and_text() {
        let index = sample_index().await;
        let results = index.query("jazz", 1).await.unwrap();
        let context = format_candidates_for_prompt(&results);

        assert!(context.contains("filepath: /music/jazz/blue_in_green.mp3"));
        assert!(context.contains(&results[0].document.content));
    }
}
