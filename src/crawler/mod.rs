//! Crawler module for page traversal and file download
//!
//! This module contains the core harvesting logic, including:
//! - HTTP transport and failure classification
//! - HTML anchor extraction
//! - Link classification
//! - Gated file download and destination naming
//! - Entry-point discovery and overall crawl coordination

mod classifier;
mod coordinator;
mod downloader;
mod fetcher;
mod filename;
mod parser;
mod seeder;

pub use classifier::{classify_link, LinkAction};
pub use coordinator::{page_stem, Coordinator};
pub use downloader::{check_probe, DownloadOutcome, Downloader};
pub use fetcher::{build_http_client, classify_error, Fetched, HttpTransport, Probe};
pub use filename::{derive_folder, resolve_filename};
pub use parser::{decode_page, parse_anchors, Anchor};
pub use seeder::{derive_folders, seed_entries, SeedEntry};

use crate::config::Config;
use crate::segment::Segmenter;
use crate::HarvestError;

/// Runs a complete harvest
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Discover the per-year entry points on each top-level page
/// 3. Crawl each entry point and download the result files it links to
/// 4. Log a summary of the run
///
/// # Example
///
/// ```no_run
/// use ballot_harvest::config::Config;
/// use ballot_harvest::crawler::harvest;
/// use ballot_harvest::segment::Segmenter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let segmenter = Segmenter::load(None)?;
/// harvest(Config::default(), segmenter).await?;
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: Config, segmenter: Segmenter) -> Result<(), HarvestError> {
    let mut coordinator = Coordinator::new(config, segmenter)?;
    coordinator.run().await
}
