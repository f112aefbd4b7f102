//! State module for tracking crawl progress
//!
//! All state is in-memory and lives for one run.
//!
//! # Components
//!
//! - `VisitedSet`: insert-or-check identifier set with a sorted view
//! - `Registry`: the URL and filename namespaces used for dedup
//! - `CrawlStats`: counters reported at the end of a run

mod stats;
mod visited;

// Re-export main types
pub use stats::CrawlStats;
pub use visited::{Registry, VisitedSet};
