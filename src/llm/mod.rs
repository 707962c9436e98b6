pub mod r#trait;
pub mod ollama;
pub mod gemini;

pub use gemini::GeminiClient;
pub use ollama::OllamaGenerator;
pub use r#trait::TextGenerator;
