use crate::models::ScoredDocument;
use crate::store::VectorIndex;
use anyhow::Result;

/// Top-K similarity retriever over a vector index
pub struct Retriever<I: VectorIndex> {
    index: I,
    k: usize,
}

impl<I: VectorIndex> Retriever<I> {
    pub fn new(index: I, k: usize) -> Self {
        Self { index, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Return up to K documents most similar to the query, most-similar first
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredDocument>> {
        self.index.search(query, self.k).await
    }
}
