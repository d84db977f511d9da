//! MW CLI - Mediawire integration toolkit.
//!
//! Provides commands for:
//! - `inspect`: Parse a Mediawire URL and report its derived forms
//! - `launch`: Build a signed LTI launch page
//! - `embed`: Build iframe embed markup
//! - `metadata`: Resolve media metadata fields
//! - `thumbnail`: Download and cache a media thumbnail

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EmbedArgs, InspectArgs, LaunchArgs, MetadataArgs, ThumbnailArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// MW - Mediawire integration toolkit.
#[derive(Parser)]
#[command(name = "mw", version, about)]
struct Cli {
    /// Enable verbose logging (INFO level).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a Mediawire URL and report its derived forms.
    Inspect(InspectArgs),
    /// Build a signed LTI launch page for a media URL.
    Launch(LaunchArgs),
    /// Build iframe embed markup for a media URL.
    Embed(EmbedArgs),
    /// Resolve metadata fields for a media URL.
    Metadata(MetadataArgs),
    /// Download and cache the thumbnail for a media URL.
    Thumbnail(ThumbnailArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Inspect(args) => args.execute(),
        Commands::Launch(args) => args.execute(VERSION),
        Commands::Embed(args) => args.execute(),
        Commands::Metadata(args) => args.execute(),
        Commands::Thumbnail(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
