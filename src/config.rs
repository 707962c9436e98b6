use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mongo: MongoConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// Connection string; usually left unset and taken from MONGODB_URI
    #[serde(default)]
    pub uri: Option<String>,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    /// Embedding model served by Ollama
    pub embed_model: String,
    #[serde(default = "default_embedding_dims")]
    pub embed_dims: usize,
    /// Generation model used by the question-answering loop
    pub chat_model: String,
}

fn default_embedding_dims() -> usize {
    1024 // mxbai-embed-large dimension
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub model: String,
    /// API key; usually left unset and taken from GOOGLE_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the persisted vector store
    pub dir: String,
    /// Logical collection name recorded in the population marker
    pub collection_name: String,
    /// CSV file the index is built from
    pub source_csv: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            PathBuf::from("config/settings.toml"),
            PathBuf::from("./config/settings.toml"),
            PathBuf::from("~/.config/kisanrag/settings.toml"),
        ];

        for path in &default_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Get MongoDB connection string from config or environment variable
    pub fn mongo_uri(&self) -> Option<String> {
        self.mongo.uri
            .clone()
            .or_else(|| std::env::var("MONGODB_URI").ok())
    }

    /// Get Gemini API key from config or environment variable
    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini.api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo: MongoConfig::default(),
            ollama: OllamaConfig::default(),
            gemini: GeminiConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: "farmers".to_string(),
            collection: "schemes".to_string(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434".to_string(),
            embed_model: "mxbai-embed-large".to_string(),
            embed_dims: 1024,
            chat_model: "llama3.2".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            api_key: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: "./scheme_index".to_string(),
            collection_name: "schemesInfo".to_string(),
            source_csv: "updated_data.csv".to_string(),
            top_k: 5,
        }
    }
}
