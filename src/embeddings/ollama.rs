use crate::embeddings::EmbeddingProvider;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Embedding provider backed by the Ollama API
pub struct OllamaEmbeddingProvider {
    base_url: String,
    model: String,
    dimension: AtomicUsize, // updated at runtime if the model reports differently
}

impl OllamaEmbeddingProvider {
    /// Determine embedding dimension from model name
    pub(crate) fn get_dimension_for_model(model: &str) -> usize {
        match model {
            m if m.contains("mxbai-embed") => 1024,
            m if m.contains("nomic-embed") => 768,
            m if m.contains("e5") => 768,
            _ => 768,
        }
    }

    /// Create a new Ollama embedding provider
    /// Uses the provided dimension, or auto-detects from model name if not provided
    pub fn new(base_url: Option<&str>, model: Option<&str>, dimension: Option<usize>) -> Self {
        let model_name = model.unwrap_or("mxbai-embed-large").to_string();
        let dimension = dimension.unwrap_or_else(|| Self::get_dimension_for_model(&model_name));

        Self {
            base_url: base_url.unwrap_or("http://127.0.0.1:11434").to_string(),
            model: model_name,
            dimension: AtomicUsize::new(dimension),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize, Deserialize)]
struct OllamaEmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn compute_embedding(&self, content: &str) -> Result<Vec<f32>> {
        let content = content.trim();
        if content.is_empty() {
            anyhow::bail!("Cannot generate embedding for empty content");
        }

        let url = format!("{}/api/embeddings", self.base_url);

        let request = OllamaEmbeddingRequest {
            model: self.model.clone(),
            prompt: content.to_string(),
        };

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama API returned error: {}", response.status());
        }

        let embedding_response: OllamaEmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse Ollama embedding response")?;

        if embedding_response.embedding.is_empty() {
            anyhow::bail!(
                "Ollama returned empty embedding (dimension 0). This usually means the input content was too short or empty."
            );
        }

        // The model may report a different dimension than expected; keep ours in sync
        let actual_dimension = embedding_response.embedding.len();
        let expected_dimension = self.dimension.load(Ordering::Relaxed);
        if actual_dimension != expected_dimension {
            eprintln!(
                "Info: Model '{}' returned embedding dimension {} (expected {}). Updating to match actual dimension.",
                self.model, actual_dimension, expected_dimension
            );
            self.dimension.store(actual_dimension, Ordering::Relaxed);
        }

        Ok(embedding_response.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension.load(Ordering::Relaxed)
    }
}
