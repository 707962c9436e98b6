use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Input;
use kisanrag::{
    config::Config,
    embeddings::OllamaEmbeddingProvider,
    llm::{OllamaGenerator, TextGenerator},
    qa,
    store::{LocalVectorStore, Retriever},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kisanrag-ask")]
#[command(about = "Ask questions about farmer welfare schemes")]
#[command(version)]
struct Cli {
    /// Vector store directory (overrides config)
    #[arg(long)]
    index_dir: Option<String>,

    /// Number of schemes to retrieve per question (overrides config)
    #[arg(long)]
    top_k: Option<usize>,

    /// Ollama URL (overrides config)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Generation model (overrides config)
    #[arg(long)]
    chat_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let index_dir = cli.index_dir.unwrap_or_else(|| config.index.dir.clone());
    let index_dir = PathBuf::from(shellexpand::tilde(&index_dir).into_owned());
    let top_k = cli.top_k.unwrap_or(config.index.top_k);
    let ollama_url = cli.ollama_url.unwrap_or_else(|| config.ollama.url.clone());
    let chat_model = cli
        .chat_model
        .unwrap_or_else(|| config.ollama.chat_model.clone());

    let embedding_provider = OllamaEmbeddingProvider::new(
        Some(&ollama_url),
        Some(&config.ollama.embed_model),
        Some(config.ollama.embed_dims),
    );
    let store = LocalVectorStore::open(&index_dir, Box::new(embedding_provider))
        .context("Failed to open vector store")?;
    println!(
        "Loaded {} schemes from {}",
        store.len(),
        index_dir.display()
    );

    let retriever = Retriever::new(store, top_k);
    let generator = OllamaGenerator::new(Some(&ollama_url), Some(&chat_model));

    loop {
        println!("\n\n-------------------------------");
        let question: String = Input::new()
            .with_prompt("Ask your question (q to quit)")
            .interact_text()
            .context("Failed to read question")?;
        println!("\n");

        if question == "q" {
            break;
        }

        let hits = retriever.retrieve(&question).await?;
        let context = qa::format_context(&hits);
        let prompt = qa::build_prompt(&context, &question);

        let answer = generator.generate(&prompt).await?;
        println!("Answer: {}", answer);
        println!("\n[Retrieved {} relevant schemes]", hits.len());
    }

    Ok(())
}
