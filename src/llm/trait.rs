use anyhow::Result;

/// Trait for language-model providers that turn a prompt into generated text
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given prompt (non-streaming)
    async fn generate(&self, prompt: &str) -> Result<String>;
}
