use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kisanrag::{
    config::Config,
    embeddings::{EmbeddingProvider, OllamaEmbeddingProvider},
    source,
    store::{source_checksum, LocalVectorStore, VectorIndex},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kisanrag-index")]
#[command(about = "Build the scheme vector store from the CSV export")]
#[command(version)]
struct Cli {
    /// CSV file to index (overrides config)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Vector store directory (overrides config)
    #[arg(long)]
    index_dir: Option<String>,

    /// Ollama URL (overrides config)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Embedding model (overrides config)
    #[arg(long)]
    embed_model: Option<String>,

    /// Discard an existing store and rebuild it
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let csv_path = cli
        .csv
        .unwrap_or_else(|| PathBuf::from(&config.index.source_csv));
    let index_dir = cli.index_dir.unwrap_or_else(|| config.index.dir.clone());
    let index_dir = PathBuf::from(shellexpand::tilde(&index_dir).into_owned());
    let ollama_url = cli.ollama_url.unwrap_or_else(|| config.ollama.url.clone());
    let embed_model = cli
        .embed_model
        .unwrap_or_else(|| config.ollama.embed_model.clone());

    let checksum = source_checksum(&csv_path)?;

    if LocalVectorStore::is_populated(&index_dir) {
        if !cli.force {
            let meta = LocalVectorStore::read_meta(&index_dir)?;
            println!(
                "Vector store at {} is already populated ({} documents), skipping.",
                index_dir.display(),
                meta.document_count
            );
            if meta.source_checksum != checksum {
                eprintln!(
                    "⚠️  {} has changed since the store was built; rerun with --force to rebuild",
                    csv_path.display()
                );
            }
            return Ok(());
        }

        println!("Discarding existing store at {}", index_dir.display());
        LocalVectorStore::clear_location(&index_dir)?;
    }

    println!("Indexing schemes from {}", csv_path.display());

    let rows = source::load_scheme_rows(&csv_path)?;
    let documents = source::build_documents(&rows);
    println!("Loaded {} schemes", documents.len());

    let embedding_provider = OllamaEmbeddingProvider::new(
        Some(&ollama_url),
        Some(&embed_model),
        Some(config.ollama.embed_dims),
    );
    println!(
        "📊 Generating embeddings with Ollama model: {} ({} dimensions)",
        embed_model,
        embedding_provider.dimension()
    );

    let mut store = LocalVectorStore::create(
        &index_dir,
        &config.index.collection_name,
        &embed_model,
        Box::new(embedding_provider),
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} schemes embedded")
            .unwrap()
            .progress_chars("#>-"),
    );

    for document in documents {
        store
            .add_documents(vec![document])
            .await
            .context("Failed to embed scheme")?;
        pb.inc(1);
    }
    pb.finish();

    store.persist(&checksum)?;

    println!(
        "\n✓ Indexed {} schemes into {}",
        store.len(),
        index_dir.display()
    );

    Ok(())
}
