//! Ballot-Harvest main entry point
//!
//! This is the command-line interface for the Ballot-Harvest results downloader.

use anyhow::Context;
use ballot_harvest::config::{load_config_with_hash, Config};
use ballot_harvest::crawler::harvest;
use ballot_harvest::segment::Segmenter;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Ballot-Harvest: an election results downloader
///
/// Ballot-Harvest walks a results website from its top-level page, finds
/// the per-year entry points and saves every result file it reaches into a
/// `year/contest/...` directory tree.
#[derive(Parser, Debug)]
#[command(name = "ballot-harvest")]
#[command(version)]
#[command(about = "An election results downloader", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ballot_harvest=info,warn"),
            1 => EnvFilter::new("ballot_harvest=debug,info"),
            2 => EnvFilter::new("ballot_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Ballot-Harvest Dry Run ===\n");

    println!("Top-level pages ({}):", config.seeder.pages.len());
    for page in &config.seeder.pages {
        println!("  - {}", page);
    }

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Throttle interval: {}", config.crawler.throttle_interval);
    println!("  Follow text: {:?}", config.crawler.follow_text);
    println!("  Target extensions: {}", config.crawler.target_extensions.join(" "));
    println!("  Blocked schemes: {}", config.crawler.blocked_schemes.join(" "));
    println!(
        "  Blocked extensions: {}",
        config.crawler.blocked_extensions.join(" ")
    );

    println!("\nDownload Gates:");
    println!("  Max file size: {} bytes", config.download.max_file_size);
    match &config.download.target_content_type {
        Some(content_type) => println!("  Content-Type: {}", content_type),
        None => println!("  Content-Type: any"),
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput root: {}", config.output.root);
    println!(
        "Dictionary: {}",
        config
            .segmentation
            .dictionary
            .as_deref()
            .unwrap_or("(embedded)")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    let segmenter = Segmenter::load(config.segmentation.dictionary.as_deref().map(Path::new))
        .context("failed to load segmentation dictionary")?;
    tracing::debug!("Segmenter ready with {} words", segmenter.len());

    tracing::info!(
        "Harvesting from {} top-level page(s) into {}",
        config.seeder.pages.len(),
        config.output.root
    );

    match harvest(config, segmenter).await {
        Ok(()) => {
            tracing::info!("Harvest completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
