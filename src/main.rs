//! # imgfetch CLI
//!
//! Command-line interface for the imgfetch library.
//! Fetches a list of image URLs into a local directory, one after another.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use imgfetch::{DuplicatePolicy, FetchConfig, FetchOptions, Fetcher, DEFAULT_MAX_SIZE};
use log::error;

mod cli;

/// Command-line interface for imgfetch
#[derive(Parser)]
#[command(name = "imgfetch")]
#[command(about = "Fetch images over HTTP with content checks and duplicate detection")]
#[command(long_about = "Fetches images from a list of URLs into a local directory:
  imgfetch https://example.com/cat.png           # Save to ./Fetched_Images/cat.png
  imgfetch -i urls.txt                           # One URL per line, # for comments
  imgfetch --max-size 1048576 URL...             # Skip anything over 1 MiB

Responses that are not image/* or that exceed the size limit are skipped.
Content seen earlier in the same run is reported as a duplicate:
  --on-duplicate skip                            # Delete the new copy (default)
  --on-duplicate keep                            # Keep it, only report")]
#[command(version = env!("IMGFETCH_VERSION"))]
struct Cli {
    /// Image URLs to fetch
    urls: Vec<String>,

    /// File with additional URLs, one per line
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory images are saved to (created if missing)
    #[arg(short, long, default_value = imgfetch::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Largest accepted image in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,

    /// Connect and read timeout in seconds (longest gap between reads)
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// What to do with content already fetched in this run: skip or keep
    #[arg(long, default_value = "skip")]
    on_duplicate: DuplicatePolicy,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            output_dir: self.output_dir.clone(),
            timeout: Duration::from_secs(self.timeout),
            connect_timeout: Duration::from_secs(self.timeout),
            ..Default::default()
        }
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            max_size: self.max_size,
            duplicates: self.on_duplicate,
            progress: Arc::new(cli::ProgressManager::new()),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("imgfetch v{} starting...", env!("IMGFETCH_VERSION"));
    }

    let urls = cli::collect_urls(&cli.urls, cli.input.as_deref())?;
    if urls.is_empty() {
        anyhow::bail!("No URLs given (pass them as arguments or with --input)");
    }

    if cli.dry_run {
        let dir = cli.output_dir.display();
        for url in &urls {
            eprintln!("🔍 [DRY RUN] Would fetch: {url} into {dir}");
        }
        return Ok(());
    }

    let mut fetcher = Fetcher::with_config(cli.fetch_config(), cli.fetch_options())?;
    let summary = fetcher.fetch_all(&urls).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!("{summary}");
    }

    Ok(())
}
