use crate::models::{SchemeDocument, ScoredDocument};
use anyhow::Result;

/// Trait for similarity-searchable document stores
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed and add documents to the in-memory index
    async fn add_documents(&mut self, documents: Vec<SchemeDocument>) -> Result<()>;

    /// Return up to `k` documents most similar to the query, most-similar first
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>>;
}
