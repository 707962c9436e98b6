use anyhow::{Context, Result};
use clap::Parser;
use kisanrag::{config::Config, db::SchemeDb, export};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kisanrag-export")]
#[command(about = "Export the scheme collection to a JSON file")]
#[command(version)]
struct Cli {
    /// Output JSON file
    #[arg(long, default_value = "myCollection.json")]
    output: PathBuf,

    /// MongoDB connection string (overrides config and env)
    #[arg(long)]
    uri: Option<String>,

    /// Database name (overrides config)
    #[arg(long)]
    database: Option<String>,

    /// Collection name (overrides config)
    #[arg(long)]
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let uri = cli
        .uri
        .or_else(|| config.mongo_uri())
        .context("MONGODB_URI environment variable not set")?;
    let database = cli.database.unwrap_or_else(|| config.mongo.database.clone());
    let collection = cli
        .collection
        .unwrap_or_else(|| config.mongo.collection.clone());

    println!(
        "Exporting {}.{} to {}",
        database,
        collection,
        cli.output.display()
    );

    let db = SchemeDb::connect(&uri, &database, &collection)
        .await
        .context("Failed to open scheme collection")?;

    let documents = db.fetch_all().await?;
    let values: Vec<serde_json::Value> = documents
        .into_iter()
        .map(export::document_to_json)
        .collect();

    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    export::write_pretty_json(BufWriter::new(file), &values)?;

    println!("✓ Exported {} schemes", values.len());

    Ok(())
}
