use anyhow::{Context, Result};
use clap::Parser;
use kisanrag::{
    config::Config,
    db::{SchemeDb, DOCUMENTS_FIELD, SCHEME_NAME_FIELD},
    llm::{GeminiClient, TextGenerator},
    structuring,
};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "kisanrag-structure")]
#[command(about = "Structure each scheme's documents field via the Gemini API")]
#[command(version)]
struct Cli {
    /// MongoDB connection string (overrides config and env)
    #[arg(long)]
    uri: Option<String>,

    /// Gemini API key (overrides config and env)
    #[arg(long)]
    api_key: Option<String>,

    /// Gemini model (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Parse and report without writing anything back
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let api_key = cli
        .api_key
        .or_else(|| config.gemini_api_key())
        .context("GOOGLE_API_KEY environment variable not set")?;
    let uri = cli
        .uri
        .or_else(|| config.mongo_uri())
        .context("MONGODB_URI environment variable not set")?;
    let model = cli.model.unwrap_or_else(|| config.gemini.model.clone());

    let gemini = GeminiClient::new(api_key, Some(&model));
    println!("Gemini model initialized: {}", model);

    let db = SchemeDb::connect(&uri, &config.mongo.database, &config.mongo.collection)
        .await
        .context("Failed to open scheme collection")?;

    let schemes = db.fetch_unstructured().await?;
    println!("Starting to process {} schemes...", schemes.len());

    let mut updated = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for scheme in &schemes {
        let id = match scheme.get("_id") {
            Some(id) => id,
            None => {
                eprintln!("Warning: Scheme without _id, skipping");
                skipped += 1;
                continue;
            }
        };
        let name = scheme.get_str(SCHEME_NAME_FIELD).unwrap_or("N/A");
        let document_text = scheme.get_str(DOCUMENTS_FIELD).unwrap_or("");

        if document_text.is_empty() {
            println!("Skipping scheme {} due to empty 'documents' field.", id);
            skipped += 1;
            continue;
        }

        println!("Processing scheme: {}", name);

        let prompt = structuring::extraction_prompt(document_text);
        let result = async {
            let reply = gemini.generate(&prompt).await?;
            structuring::parse_requirements(&reply)
        }
        .await;

        match result {
            Ok(requirements) if cli.dry_run => {
                println!(
                    "  ✓ Parsed {} documents for scheme {} (dry run, not written)",
                    requirements.len(),
                    id
                );
                updated += 1;
            }
            Ok(requirements) => match db.set_structured(id, &requirements).await {
                Ok(()) => {
                    println!("  ✓ Successfully updated scheme {}", id);
                    updated += 1;
                }
                Err(e) => {
                    eprintln!("  ❌ Failed to update scheme {}: {}", id, e);
                    failed += 1;
                }
            },
            Err(e) => {
                eprintln!("  ❌ Failed to process scheme {}: {}", id, e);
                failed += 1;
            }
        }

        // Fixed pause between records to stay under the API rate limit
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    println!("\nProcessing complete.");
    println!("✓ Updated {} schemes", updated);
    if skipped > 0 {
        println!("  ℹ️  Skipped {} schemes", skipped);
    }
    if failed > 0 {
        println!("  ⚠️  Failed to process {} schemes (will retry on next run)", failed);
    }

    Ok(())
}
