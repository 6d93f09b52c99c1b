mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use feedstore::{CacheLookup, FeedImage, FeedStore, StoreConfig};
use std::path::Path;

async fn retrieve(store: &FeedStore, json: bool) -> Result<()> {
    let lookup = store.retrieve().await?;

    if json {
        let cached = lookup.into_cached();
        println!("{}", serde_json::to_string_pretty(&cached)?);
        return Ok(());
    }

    match lookup {
        CacheLookup::Empty => println!("Cache is empty"),
        CacheLookup::Found(cached) => {
            println!(
                "Cached at {} ({} images)",
                cached.timestamp.to_rfc3339(),
                cached.feed.len()
            );
            for image in &cached.feed {
                println!("  {}  {}", image.id, image.url);
                if let Some(description) = &image.description {
                    println!("      description: {description}");
                }
                if let Some(location) = &image.location {
                    println!("      location: {location}");
                }
            }
        }
    }

    Ok(())
}

async fn insert(
    store: &FeedStore,
    file: &Path,
    timestamp: Option<chrono::DateTime<Utc>>,
) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let feed: Vec<FeedImage> = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid feed JSON in {}", file.display()))?;
    let timestamp = timestamp.unwrap_or_else(Utc::now);
    let count = feed.len();

    store.insert(feed, timestamp).await?;

    println!("Cached {count} images at {}", timestamp.to_rfc3339());
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config.as_deref() {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(path) = cli.store {
        config.path = path;
    }

    tracing::debug!(path = %config.path.display(), model = %config.model, "Opening feed store");
    let store = FeedStore::from_config(&config)
        .with_context(|| format!("Failed to open feed store at {}", config.path.display()))?;

    match cli.command {
        Commands::Retrieve { json } => retrieve(&store, json).await,
        Commands::Insert { file, timestamp } => insert(&store, &file, timestamp).await,
        Commands::Delete => {
            store.delete_cached_feed().await?;
            println!("Cache deleted");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "feedstore=debug,feedstore_db=debug,feedstore_core=debug".to_string()
        } else {
            "feedstore=warn,feedstore_db=warn,feedstore_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}
