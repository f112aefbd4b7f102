//! Configuration module for Ballot-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a built-in default, so `Config::default()` is the crawl
//! the tool runs when no file is given.
//!
//! # Example
//!
//! ```no_run
//! use ballot_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DownloadConfig, OutputConfig, SeederConfig, SegmentationConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
