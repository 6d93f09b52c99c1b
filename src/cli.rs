use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedstore")]
#[command(author, version, about = "Inspect and manage a cached feed snapshot")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config file's path
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the cached feed
    Retrieve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the cached feed with images read from a JSON file
    Insert {
        /// JSON array of feed images
        #[arg(required = true)]
        file: PathBuf,

        /// Cache timestamp (RFC 3339); defaults to now
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// Remove the cached feed
    Delete,
}
