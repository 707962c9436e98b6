use crate::embeddings::EmbeddingProvider;
use crate::models::{SchemeDocument, ScoredDocument};
use crate::store::VectorIndex;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const DOCUMENTS_FILE: &str = "documents.json";
const MARKER_FILE: &str = "index_meta.json";

/// A stored document paired with its embedding vector
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDocument {
    document: SchemeDocument,
    embedding: Vec<f32>,
}

/// Population marker written after all documents have been persisted.
/// Only a readable marker counts as "populated", so a crash mid-populate
/// leaves the location unpopulated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexMeta {
    pub collection_name: String,
    pub embed_model: String,
    pub dimension: usize,
    pub document_count: usize,
    /// Blake3 checksum of the source CSV the index was built from
    pub source_checksum: String,
}

/// JSON-file-backed vector store with cosine-similarity search
pub struct LocalVectorStore {
    dir: PathBuf,
    collection_name: String,
    embed_model: String,
    embedder: Box<dyn EmbeddingProvider>,
    documents: Vec<StoredDocument>,
}

impl LocalVectorStore {
    /// Whether the location carries a population marker
    pub fn is_populated(dir: &Path) -> bool {
        dir.join(MARKER_FILE).is_file()
    }

    /// Read the population marker of an existing store location
    pub fn read_meta(dir: &Path) -> Result<IndexMeta> {
        let path = dir.join(MARKER_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read index marker: {}", path.display()))?;
        let meta: IndexMeta =
            serde_json::from_str(&content).context("Failed to parse index marker")?;
        Ok(meta)
    }

    /// Create an empty store ready to be populated
    pub fn create<P: Into<PathBuf>>(
        dir: P,
        collection_name: &str,
        embed_model: &str,
        embedder: Box<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            dir: dir.into(),
            collection_name: collection_name.to_string(),
            embed_model: embed_model.to_string(),
            embedder,
            documents: Vec::new(),
        }
    }

    /// Open a populated store, loading all documents into memory
    pub fn open<P: Into<PathBuf>>(dir: P, embedder: Box<dyn EmbeddingProvider>) -> Result<Self> {
        let dir = dir.into();
        let meta = Self::read_meta(&dir).with_context(|| {
            format!(
                "Vector store at {} is not populated (run kisanrag-index first)",
                dir.display()
            )
        })?;

        let path = dir.join(DOCUMENTS_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read stored documents: {}", path.display()))?;
        let documents: Vec<StoredDocument> =
            serde_json::from_str(&content).context("Failed to parse stored documents")?;

        if documents.len() != meta.document_count {
            anyhow::bail!(
                "Stored documents ({}) do not match the marker count ({})",
                documents.len(),
                meta.document_count
            );
        }

        Ok(Self {
            dir,
            collection_name: meta.collection_name,
            embed_model: meta.embed_model,
            embedder,
            documents,
        })
    }

    /// Remove persisted store files so the location can be repopulated
    pub fn clear_location(dir: &Path) -> Result<()> {
        // Marker first: a partially-cleared location must not read as populated
        for name in [MARKER_FILE, DOCUMENTS_FILE] {
            let path = dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Persist all in-memory documents, writing the population marker last
    pub fn persist(&self, source_checksum: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory: {}", self.dir.display()))?;

        let documents_path = self.dir.join(DOCUMENTS_FILE);
        let content = serde_json::to_string(&self.documents)
            .context("Failed to serialize stored documents")?;
        std::fs::write(&documents_path, content)
            .with_context(|| format!("Failed to write {}", documents_path.display()))?;

        let meta = IndexMeta {
            collection_name: self.collection_name.clone(),
            embed_model: self.embed_model.clone(),
            dimension: self.embedder.dimension(),
            document_count: self.documents.len(),
            source_checksum: source_checksum.to_string(),
        };
        let marker_path = self.dir.join(MARKER_FILE);
        let content = serde_json::to_string_pretty(&meta).context("Failed to serialize marker")?;
        std::fs::write(&marker_path, content)
            .with_context(|| format!("Failed to write {}", marker_path.display()))?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }
}

#[async_trait::async_trait]
impl VectorIndex for LocalVectorStore {
    async fn add_documents(&mut self, documents: Vec<SchemeDocument>) -> Result<()> {
        for document in documents {
            let embedding = self
                .embedder
                .compute_embedding(&document.content)
                .await
                .with_context(|| format!("Failed to embed document {}", document.id))?;
            self.documents.push(StoredDocument {
                document,
                embedding,
            });
        }
        Ok(())
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        let query_embedding = self
            .embedder
            .compute_embedding(query)
            .await
            .context("Failed to embed query")?;

        let mut scored: Vec<ScoredDocument> = self
            .documents
            .iter()
            .map(|stored| ScoredDocument {
                document: stored.document.clone(),
                score: cosine_similarity(&query_embedding, &stored.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }
}

/// Cosine similarity between two vectors; 0.0 when either has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Blake3 checksum of the source file the index is built from
pub fn source_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open source file: {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentMetadata;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Deterministic embedder for tests: fixed vectors per known text,
    /// zero vector otherwise
    struct StubEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        dims: usize,
    }

    impl StubEmbedder {
        fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
            let dims = pairs.first().map(|(_, v)| v.len()).unwrap_or(3);
            Self {
                vectors: pairs
                    .iter()
                    .map(|(text, vector)| (text.to_string(), vector.clone()))
                    .collect(),
                dims,
            }
        }
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn compute_embedding(&self, content: &str) -> Result<Vec<f32>> {
            Ok(self
                .vectors
                .get(content)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dims]))
        }

        fn dimension(&self) -> usize {
            self.dims
        }
    }

    fn doc(id: usize, content: &str) -> SchemeDocument {
        SchemeDocument {
            id: id.to_string(),
            content: content.to_string(),
            metadata: DocumentMetadata {
                slug: format!("slug-{}", id),
                tags: "test".to_string(),
            },
        }
    }

    #[test]
    fn test_cosine_similarity_known_values() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
        // Mismatched lengths and zero vectors degrade to 0.0
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity_and_truncates() {
        let embedder = StubEmbedder::new(&[
            ("crop insurance", vec![1.0, 0.0, 0.0]),
            ("a", vec![0.9, 0.1, 0.0]),
            ("b", vec![0.0, 1.0, 0.0]),
            ("c", vec![0.5, 0.5, 0.0]),
        ]);

        let mut store = LocalVectorStore::create("/tmp/unused", "schemesInfo", "stub-embed", Box::new(embedder));
        store
            .add_documents(vec![doc(0, "b"), doc(1, "a"), doc(2, "c")])
            .await
            .unwrap();

        let hits = store.search("crop insurance", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document.content, "a");
        assert_eq!(hits[1].document.content, "c");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn test_search_returns_at_most_k() {
        let embedder = StubEmbedder::new(&[("q", vec![1.0, 0.0])]);
        let mut store = LocalVectorStore::create("/tmp/unused", "schemesInfo", "stub-embed", Box::new(embedder));

        let docs: Vec<SchemeDocument> = (0..3).map(|i| doc(i, "q")).collect();
        store.add_documents(docs).await.unwrap();

        let hits = store.search("q", 5).await.unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_persist_and_open_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let embedder = || {
            Box::new(StubEmbedder::new(&[
                ("first scheme", vec![1.0, 0.0]),
                ("second scheme", vec![0.0, 1.0]),
            ]))
        };

        let mut store = LocalVectorStore::create(temp_dir.path(), "schemesInfo", "stub-embed", embedder());
        store
            .add_documents(vec![doc(0, "first scheme"), doc(1, "second scheme")])
            .await
            .unwrap();

        assert!(!LocalVectorStore::is_populated(temp_dir.path()));
        store.persist("checksum123").unwrap();
        assert!(LocalVectorStore::is_populated(temp_dir.path()));

        let meta = LocalVectorStore::read_meta(temp_dir.path()).unwrap();
        assert_eq!(meta.document_count, 2);
        assert_eq!(meta.source_checksum, "checksum123");
        assert_eq!(meta.collection_name, "schemesInfo");

        let reopened = LocalVectorStore::open(temp_dir.path(), embedder()).unwrap();
        assert_eq!(reopened.len(), 2);

        let hits = reopened.search("first scheme", 5).await.unwrap();
        assert_eq!(hits[0].document.id, "0");
    }

    #[tokio::test]
    async fn test_open_unpopulated_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let embedder = Box::new(StubEmbedder::new(&[]));
        assert!(LocalVectorStore::open(temp_dir.path(), embedder).is_err());
    }

    #[tokio::test]
    async fn test_clear_location_resets_population() {
        let temp_dir = TempDir::new().unwrap();
        let embedder = Box::new(StubEmbedder::new(&[("x", vec![1.0])]));

        let mut store = LocalVectorStore::create(temp_dir.path(), "schemesInfo", "stub-embed", embedder);
        store.add_documents(vec![doc(0, "x")]).await.unwrap();
        store.persist("sum").unwrap();
        assert!(LocalVectorStore::is_populated(temp_dir.path()));

        LocalVectorStore::clear_location(temp_dir.path()).unwrap();
        assert!(!LocalVectorStore::is_populated(temp_dir.path()));
        assert!(!temp_dir.path().join("documents.json").exists());
    }

    #[test]
    fn test_source_checksum_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.csv");
        std::fs::write(&path, "scheme_name,details\nA,B\n").unwrap();

        let first = source_checksum(&path).unwrap();
        let second = source_checksum(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        std::fs::write(&path, "scheme_name,details\nA,C\n").unwrap();
        assert_ne!(source_checksum(&path).unwrap(), first);
    }
}
