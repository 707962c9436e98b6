pub mod config;
pub mod db;
pub mod embeddings;
pub mod export;
pub mod llm;
pub mod models;
pub mod qa;
pub mod source;
pub mod store;
pub mod structuring;

pub use config::Config;
pub use db::SchemeDb;
pub use embeddings::EmbeddingProvider;
pub use llm::TextGenerator;
pub use models::{DocStatus, DocumentRequirement, SchemeDocument, SchemeRow, ScoredDocument};
pub use store::{LocalVectorStore, Retriever, VectorIndex};
