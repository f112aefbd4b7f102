//! Run counters reported once the crawl finishes

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched, parsed and traced
    pub pages_visited: u64,

    /// Files written to disk
    pub files_saved: u64,

    /// Files rejected by a gate or a file-scoped failure
    pub files_skipped: u64,

    /// Files fetched whose filename was already saved this run
    pub duplicate_filenames: u64,

    /// Pages whose subtree was abandoned after a failure
    pub branches_abandoned: u64,
}

impl CrawlStats {
    /// Logs the counters at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl summary: {} pages visited, {} files saved, {} files skipped, {} duplicate filenames, {} branches abandoned",
            self.pages_visited,
            self.files_saved,
            self.files_skipped,
            self.duplicate_filenames,
            self.branches_abandoned
        );
    }
}
