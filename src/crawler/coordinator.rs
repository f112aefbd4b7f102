//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Discovering the per-year entry points on the top-level pages
//! - Depth-bounded descent over each entry point's pages
//! - Dispatching every anchor to the downloader, the frontier or nowhere
//! - Applying the recovery table to fetch failures

use crate::config::Config;
use crate::crawler::classifier::{classify_link, LinkAction};
use crate::crawler::downloader::{DownloadOutcome, Downloader};
use crate::crawler::fetcher::HttpTransport;
use crate::crawler::parser::{decode_page, parse_anchors};
use crate::crawler::seeder::{seed_entries, SeedEntry};
use crate::segment::Segmenter;
use crate::state::{CrawlStats, Registry};
use crate::{FetchError, HarvestError};
use std::path::{Path, PathBuf};

/// One pending unit of crawl work
#[derive(Debug, Clone)]
enum Work<'a> {
    /// Visit a page and expand its anchors
    Page {
        url: String,
        folder: &'a Path,
        depth: u32,
    },
    /// Hand a file link to the downloader
    Download { url: String, folder: &'a Path },
    /// Every anchor below a visited page has been handled
    Finished { url: String, depth: u32 },
}

/// Main crawler coordinator structure
///
/// Owns every piece of run state. The dedup registry is handed out by
/// `&mut` to the downloader, so nothing needs synchronising.
pub struct Coordinator {
    config: Config,
    transport: HttpTransport,
    segmenter: Segmenter,
    registry: Registry,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `segmenter` - The loaded word segmenter used to name folders
    pub fn new(config: Config, segmenter: Segmenter) -> Result<Self, HarvestError> {
        let transport = HttpTransport::new(&config.user_agent)?;
        Ok(Self::with_transport(config, segmenter, transport))
    }

    /// Creates a coordinator around an existing transport
    pub fn with_transport(config: Config, segmenter: Segmenter, transport: HttpTransport) -> Self {
        Self {
            config,
            transport,
            segmenter,
            registry: Registry::new(),
            stats: CrawlStats::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the whole harvest
    ///
    /// For each configured top-level page:
    /// 1. Fetch the page and collect its `<year> <topic>` anchors
    /// 2. Crawl each entry point from depth 0 into `root/year/topic`
    ///
    /// A top-level page that fails recoverably is skipped; the others still
    /// run.
    pub async fn run(&mut self) -> Result<(), HarvestError> {
        let root = PathBuf::from(&self.config.output.root);
        let pages = self.config.seeder.pages.clone();

        for page in &pages {
            let entries = match self.discover(page).await {
                Ok(entries) => entries,
                Err(failure) => {
                    self.abandon(page, failure)?;
                    continue;
                }
            };
            tracing::info!("Found {} entry points on {}", entries.len(), page);

            for entry in entries {
                let folder = root.join(&entry.year).join(&entry.topic);
                tracing::info!("Crawling {} into {}", entry.url, folder.display());
                self.crawl(&entry.url, &folder, 0).await?;
            }
        }

        self.report();
        Ok(())
    }

    /// Fetches a top-level page and extracts its entry points
    async fn discover(&self, page: &str) -> Result<Vec<SeedEntry>, FetchError> {
        let html = self.fetch_page(page).await?;
        Ok(seed_entries(&html, page))
    }

    /// Crawls from `url`, saving every file found into the tree under `folder`
    ///
    /// Anchors are handled in parse order exactly as a recursive descent
    /// would: a file link is downloaded when it is reached and a followed
    /// link's whole subtree is explored before the next anchor. A page is
    /// skipped when its depth reaches `max-depth` or when its URL was
    /// already visited this run. The page's trace line is emitted once its
    /// subtree is done.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The subtree was explored; recoverable failures were logged
    /// * `Err(HarvestError)` - A fatal failure stopped the crawl
    pub async fn crawl(&mut self, url: &str, folder: &Path, depth: u32) -> Result<(), HarvestError> {
        let max_depth = self.config.crawler.max_depth;
        let mut frontier = vec![Work::Page {
            url: url.to_string(),
            folder,
            depth,
        }];

        while let Some(work) = frontier.pop() {
            match work {
                Work::Page { url, folder, depth } => {
                    if depth >= max_depth {
                        tracing::trace!("Depth limit reached at {}", url);
                        continue;
                    }
                    if !self.registry.urls.register(&url) {
                        tracing::trace!("Already visited {}", url);
                        continue;
                    }

                    let html = match self.fetch_page(&url).await {
                        Ok(html) => html,
                        Err(failure) => {
                            self.abandon(&url, failure)?;
                            continue;
                        }
                    };
                    self.stats.pages_visited += 1;

                    let pending = self.expand(&url, &html, folder, depth);
                    // Below the page's own children so it pops after them
                    frontier.push(Work::Finished { url, depth });
                    frontier.extend(pending.into_iter().rev());
                }
                Work::Download { url, folder } => self.download(&url, folder).await?,
                Work::Finished { url, depth } => {
                    tracing::info!("{}{}", ". ".repeat(depth as usize), last_segment(&url));
                }
            }
        }

        Ok(())
    }

    /// Turns a page's anchors into work items in parse order
    fn expand<'a>(&self, url: &str, html: &str, folder: &'a Path, depth: u32) -> Vec<Work<'a>> {
        let stem = page_stem(url);
        let mut pending = Vec::new();

        for anchor in parse_anchors(html) {
            let action = classify_link(
                anchor.href.as_deref(),
                anchor.text.as_deref(),
                depth,
                &self.config.crawler,
            );
            let Some(href) = anchor.href else {
                continue;
            };
            let next_url = format!("{}/{}", stem, href);

            match action {
                LinkAction::Download => pending.push(Work::Download {
                    url: next_url,
                    folder,
                }),
                LinkAction::Follow => pending.push(Work::Page {
                    url: next_url,
                    folder,
                    depth: depth + 1,
                }),
                LinkAction::Skip => tracing::trace!("Skipping {}", next_url),
            }
        }

        pending
    }

    /// Runs one file link through the downloader and counts the outcome
    async fn download(&mut self, url: &str, folder: &Path) -> Result<(), HarvestError> {
        let downloader = Downloader::new(&self.transport, &self.config.download, &self.segmenter);
        match downloader.fetch(&mut self.registry, url, folder).await? {
            DownloadOutcome::Saved(_) => self.stats.files_saved += 1,
            DownloadOutcome::Skipped(_) => self.stats.files_skipped += 1,
            DownloadOutcome::DuplicateFilename(_) => self.stats.duplicate_filenames += 1,
            DownloadOutcome::AlreadyVisited => {}
        }
        Ok(())
    }

    /// GETs a page and decodes it for parsing
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let fetched = self.transport.get(url).await?;
        if !fetched.is_success() {
            return Err(FetchError::Status(fetched.status));
        }
        decode_page(fetched.body)
    }

    /// Logs and counts an abandoned branch, or escalates a fatal failure
    fn abandon(&mut self, url: &str, failure: FetchError) -> Result<(), HarvestError> {
        if failure.is_fatal() {
            return Err(HarvestError::Fetch {
                url: url.to_string(),
                source: failure,
            });
        }

        tracing::warn!("Didn't crawl {}. {}", url, failure);
        self.stats.branches_abandoned += 1;
        Ok(())
    }

    /// Logs the run counters and the saved filenames in alphabetical order
    fn report(&mut self) {
        self.stats.log_summary();
        for filename in self.registry.filenames.sorted_view() {
            tracing::debug!("  saved {}", filename);
        }
    }
}

/// Everything before the URL's last `/`
///
/// Child links are built as `stem + "/" + href`. This is plain
/// concatenation, not reference resolution.
pub fn page_stem(url: &str) -> &str {
    url.rsplit_once('/').map(|(stem, _)| stem).unwrap_or("")
}

/// The URL's final `/`-delimited segment
fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
